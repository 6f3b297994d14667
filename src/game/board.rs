use std::fmt;

use super::player::Player;
use crate::error::MoveError;

pub const HEIGHT: usize = 6;
pub const WIDTH: usize = 7;

/// Number of aligned pieces needed to win.
pub const RUN_LENGTH: usize = 4;

/// Step vectors (row, col) for the four run directions: horizontal,
/// vertical, diagonal down-right, diagonal down-left. Scanning every cell
/// as the first cell of a run covers the opposite directions too.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Coordinates (row, col) of a four-in-a-row.
pub type Line = [(usize, usize); RUN_LENGTH];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row HEIGHT - 1 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Bounds-checked variant of [`Board::get`].
    pub fn try_get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Lowest empty row in a column, or `None` if the column is full or
    /// out of range.
    pub fn find_landing_row(&self, col: usize) -> Option<usize> {
        if col >= WIDTH {
            return None;
        }
        (0..HEIGHT).rev().find(|&row| self.cells[row][col].is_empty())
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        self.find_landing_row(col).is_none()
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= WIDTH {
            return Err(MoveError::InvalidColumn(col));
        }
        let row = self
            .find_landing_row(col)
            .ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = player.to_cell();
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Number of cells still empty
    pub fn empty_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_empty()).count()
    }

    /// Check whether `player` owns any four-in-a-row
    pub fn has_four(&self, player: Player) -> bool {
        self.winning_line(player).is_some()
    }

    /// First four-in-a-row owned by `player`, scanning origins top-left to
    /// bottom-right and directions in [`DIRECTIONS`] order.
    pub fn winning_line(&self, player: Player) -> Option<Line> {
        let target = player.to_cell();
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                for &dir in &DIRECTIONS {
                    if let Some(line) = self.run_from(row, col, dir) {
                        if line.iter().all(|&(r, c)| self.cells[r][c] == target) {
                            return Some(line);
                        }
                    }
                }
            }
        }
        None
    }

    /// Coordinates of the run starting at (row, col) stepping by `dir`, or
    /// `None` if any of them fall off the board.
    fn run_from(&self, row: usize, col: usize, (dr, dc): (isize, isize)) -> Option<Line> {
        let mut line = [(0, 0); RUN_LENGTH];
        for (k, slot) in line.iter_mut().enumerate() {
            let r = row.checked_add_signed(dr * k as isize)?;
            let c = col.checked_add_signed(dc * k as isize)?;
            if r >= HEIGHT || c >= WIDTH {
                return None;
            }
            *slot = (r, c);
        }
        Some(line)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Occupied(Player::One) => "1",
                    Cell::Occupied(Player::Two) => "2",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
