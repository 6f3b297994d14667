//! # Connect Four
//!
//! A two-player Connect Four game: a rules engine that owns the board and
//! decides wins and ties, and a terminal UI built with Ratatui that drives it.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, engine
//! - [`ui`] — Terminal UI: game view and key handling
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod ui;
