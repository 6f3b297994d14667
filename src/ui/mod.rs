//! Terminal UI: renders the board and turns key presses into moves.

mod app;
mod game_view;

pub use app::App;
