//! Grid snake for the terminal.
//!
//! The simulation lives in `board`, `engine`, `latch` and `controller` and
//! has no terminal dependencies. `render`, `ui` and `app` adapt it to
//! ratatui and crossterm.

pub mod app;
pub mod board;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod latch;
pub mod render;
pub mod rng;
pub mod ui;
