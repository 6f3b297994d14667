use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info};

use super::board::{Board, Cell, Line, WIDTH};
use super::player::Player;
use crate::error::MoveError;

/// Where a piece landed and who dropped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub player: Player,
}

/// State of the game as read off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    Won(Player),
    Tied,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        self != GameResult::Ongoing
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Won(player) => Some(player),
            _ => None,
        }
    }
}

/// Answer to a single [`GameEngine::attempt_move`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing changed: the column was full or out of range, or the game
    /// had already ended.
    Rejected,
    Placed(Placement),
    PlacedAndWon(Placement),
    PlacedAndTied(Placement),
}

impl MoveOutcome {
    pub fn placement(self) -> Option<Placement> {
        match self {
            MoveOutcome::Rejected => None,
            MoveOutcome::Placed(p) | MoveOutcome::PlacedAndWon(p) | MoveOutcome::PlacedAndTied(p) => {
                Some(p)
            }
        }
    }

    pub fn is_rejected(self) -> bool {
        self == MoveOutcome::Rejected
    }
}

/// Notifications sent to subscribers as moves are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PiecePlaced(Placement),
    GameOver(GameResult),
}

/// Owns the board and the active player, and decides every move.
///
/// A finished game stays finished: start a new one by constructing a new
/// engine.
#[derive(Debug)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
    moves_played: usize,
    last_placement: Option<Placement>,
    subscribers: Vec<Sender<GameEvent>>,
}

impl GameEngine {
    /// Empty board, player one to move.
    pub fn new() -> Self {
        GameEngine {
            board: Board::new(),
            current_player: Player::One,
            moves_played: 0,
            last_placement: None,
            subscribers: Vec::new(),
        }
    }

    /// Register for [`GameEvent`]s. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Player whose turn it is. After a win this stays the winner.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cell contents, or `None` for coordinates off the board.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<Cell> {
        self.board.try_get(row, column)
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    pub fn last_placement(&self) -> Option<Placement> {
        self.last_placement
    }

    /// Lowest empty row in `column`; `None` if full or out of range.
    pub fn find_landing_row(&self, column: usize) -> Option<usize> {
        self.board.find_landing_row(column)
    }

    /// Derive the result from the current board.
    pub fn result(&self) -> GameResult {
        let mover = self.current_player;
        if let Some(winner) = [mover, mover.other()]
            .into_iter()
            .find(|&p| self.board.has_four(p))
        {
            GameResult::Won(winner)
        } else if self.board.is_full() {
            GameResult::Tied
        } else {
            GameResult::Ongoing
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.result().is_terminal()
    }

    /// The winner's four-in-a-row, if the game has been won.
    pub fn winning_line(&self) -> Option<Line> {
        self.result()
            .winner()
            .and_then(|winner| self.board.winning_line(winner))
    }

    /// Columns that would accept a piece right now.
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..WIDTH)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop a piece for the active player and resolve the move.
    ///
    /// Resolution order is win, then tie, then hand the turn over. A move
    /// that fills the board while completing four is a win.
    pub fn apply_move(&mut self, column: usize) -> Result<(Placement, GameResult), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        let row = self.board.drop_piece(column, player)?;
        let placement = Placement { row, column, player };
        self.moves_played += 1;
        self.last_placement = Some(placement);
        debug!(
            "move {}: {} dropped into column {} (row {})",
            self.moves_played,
            player.name(),
            column,
            row
        );
        self.emit(GameEvent::PiecePlaced(placement));

        let result = if self.board.has_four(player) {
            GameResult::Won(player)
        } else if self.board.is_full() {
            GameResult::Tied
        } else {
            self.current_player = player.other();
            GameResult::Ongoing
        };

        match result {
            GameResult::Won(winner) => info!("{} wins after {} moves", winner.name(), self.moves_played),
            GameResult::Tied => info!("board full after {} moves, game tied", self.moves_played),
            GameResult::Ongoing => {}
        }
        if result.is_terminal() {
            self.emit(GameEvent::GameOver(result));
        }

        Ok((placement, result))
    }

    /// Like [`GameEngine::apply_move`], folding every refusal into
    /// [`MoveOutcome::Rejected`].
    pub fn attempt_move(&mut self, column: usize) -> MoveOutcome {
        match self.apply_move(column) {
            Ok((placement, GameResult::Ongoing)) => MoveOutcome::Placed(placement),
            Ok((placement, GameResult::Won(_))) => MoveOutcome::PlacedAndWon(placement),
            Ok((placement, GameResult::Tied)) => MoveOutcome::PlacedAndTied(placement),
            Err(e) => {
                debug!("move rejected: {e}");
                MoveOutcome::Rejected
            }
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
