use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::{backend::Backend, Terminal};
use std::io;

use crate::config::AppConfig;
use crate::game::{GameEngine, GameEvent, GameResult, Placement, Player, WIDTH};

pub struct App {
    engine: GameEngine,
    events: Receiver<GameEvent>,
    config: AppConfig,
    selected_column: usize,
    last_move: Option<Placement>,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut engine = GameEngine::new();
        let events = engine.subscribe();
        App {
            engine,
            events,
            selected_column: config.ui.initial_column,
            config,
            last_move: None,
            should_quit: false,
            message: None,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: std::fmt::Display,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        let poll = Duration::from_millis(self.config.ui.poll_interval_ms);
        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < WIDTH {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let column = c as usize - '1' as usize;
                if column < WIDTH {
                    self.selected_column = column;
                    self.drop_piece();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.restart();
            }
            _ => {}
        }
    }

    fn restart(&mut self) {
        self.engine = GameEngine::new();
        self.events = self.engine.subscribe();
        self.selected_column = self.config.ui.initial_column;
        self.last_move = None;
        self.message = Some("New game started!".to_string());
    }

    /// Drop piece in selected column. Full columns and moves after the
    /// game has ended are ignored.
    fn drop_piece(&mut self) {
        if self.engine.is_terminal() {
            return;
        }
        if self.engine.attempt_move(self.selected_column).is_rejected() {
            debug!("ignoring drop into column {}", self.selected_column);
            return;
        }
        self.message = None;
        self.process_events();
    }

    /// Drain notifications from the engine.
    fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::PiecePlaced(placement) => {
                    self.last_move = Some(placement);
                }
                GameEvent::GameOver(result) => {
                    self.message = Some(match result {
                        GameResult::Won(player) => {
                            format!("{} wins! Press 'r' to play again.", self.player_name(player))
                        }
                        GameResult::Tied => {
                            "Neither player won - tie. Press 'r' to play again.".to_string()
                        }
                        GameResult::Ongoing => continue,
                    });
                }
            }
        }
    }

    fn player_name(&self, player: Player) -> &str {
        match player {
            Player::One => &self.config.players.one_name,
            Player::Two => &self.config.players.two_name,
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let highlight = if self.config.ui.highlight_last_move {
            self.last_move
        } else {
            None
        };
        super::game_view::render(
            frame,
            &self.engine,
            self.selected_column,
            highlight,
            &self.message,
            &self.config.players,
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, HEIGHT};
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_selector_stays_on_board() {
        let mut app = App::default();
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_column(), WIDTH - 1);
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_column(), 0);
    }

    #[test]
    fn test_digit_key_drops_into_column() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.selected_column(), 4);
        assert_eq!(
            app.engine().cell_at(HEIGHT - 1, 4),
            Some(Cell::Occupied(Player::One))
        );
        assert_eq!(app.last_move.map(|p| p.column), Some(4));
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.engine().moves_played(), 0);
    }

    #[test]
    fn test_full_column_is_ignored_silently() {
        let mut app = App::default();
        for _ in 0..HEIGHT {
            press(&mut app, KeyCode::Enter);
        }
        let player = app.engine().current_player();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine().moves_played(), HEIGHT);
        assert_eq!(app.engine().current_player(), player);
        assert_eq!(app.message(), None);
    }

    #[test]
    fn test_win_sets_message_and_blocks_input() {
        let mut app = App::default();
        for key in ['1', '2', '1', '2', '1', '2', '1'] {
            press(&mut app, KeyCode::Char(key));
        }
        assert_eq!(app.message(), Some("Red wins! Press 'r' to play again."));
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.engine().moves_played(), 7);
    }

    #[test]
    fn test_restart_resets_game() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.engine().moves_played(), 0);
        assert_eq!(app.selected_column(), 3);
        assert_eq!(app.last_move, None);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.last_move.map(|p| p.column), Some(3));
    }

    #[test]
    fn test_quit() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_render_shows_current_player() {
        let app = App::default();
        let mut terminal = Terminal::new(TestBackend::new(70, 28)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Connect Four"));
        assert!(text.contains("Current Player: Red"));
    }

    #[test]
    fn test_render_shows_game_over() {
        let mut app = App::default();
        for key in ['1', '2', '1', '2', '1', '2', '1'] {
            press(&mut app, KeyCode::Char(key));
        }
        let mut terminal = Terminal::new(TestBackend::new(70, 28)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Game Over"));
        assert!(text.contains("Red wins!"));
    }
}
