//! CLI module for haggle

pub mod app;
pub mod commands;

pub use app::HaggleApp;
pub use commands::{BookingKind, Cli, Commands};
