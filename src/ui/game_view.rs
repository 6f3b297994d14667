use crate::config::PlayersConfig;
use crate::game::{Cell, GameEngine, GameResult, Placement, Player, HEIGHT, WIDTH};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    engine: &GameEngine,
    selected_column: usize,
    last_move: Option<Placement>,
    message: &Option<String>,
    players: &PlayersConfig,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(15),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, engine, players, chunks[0]);
    render_board(frame, engine, selected_column, last_move, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, engine: &GameEngine, players: &PlayersConfig, area: Rect) {
    let name_of = |player: Player| match player {
        Player::One => players.one_name.as_str(),
        Player::Two => players.two_name.as_str(),
    };

    let (status, color) = match engine.result() {
        GameResult::Ongoing => {
            let current = engine.current_player();
            (
                format!(
                    "Current Player: {}  |  Move {}",
                    name_of(current),
                    engine.moves_played() + 1
                ),
                player_color(current),
            )
        }
        GameResult::Won(winner) => (
            format!("Game Over  |  {} wins", name_of(winner)),
            player_color(winner),
        ),
        GameResult::Tied => ("Game Over  |  Tie".to_string(), Color::White),
    };

    let header = Paragraph::new(status)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(
    frame: &mut Frame,
    engine: &GameEngine,
    selected_column: usize,
    last_move: Option<Placement>,
    area: Rect,
) {
    let board = engine.board();
    let winning_line = engine.winning_line();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..WIDTH {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    let rule = "═".repeat(WIDTH * 3 + 1);
    lines.push(Line::from(format!("  ╔{rule}╗")));

    for row in 0..HEIGHT {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..WIDTH {
            let in_line = winning_line.is_some_and(|line| line.contains(&(row, col)));
            let is_last = last_move.is_some_and(|p| p.row == row && p.column == col);
            let span = match board.get(row, col) {
                Cell::Empty => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                Cell::Occupied(player) => {
                    let mut style = Style::default().fg(player_color(player));
                    if is_last {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    let symbol = if in_line {
                        " ◆ "
                    } else if is_last {
                        " ◉ "
                    } else {
                        " ● "
                    };
                    Span::styled(symbol, style)
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{rule}╝")));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..WIDTH {
        if col == selected_column && !engine.is_terminal() {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from("←/→: Move  |  1-7: Drop in column  |  Enter: Drop  |  R: Restart  |  Q: Quit");

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
