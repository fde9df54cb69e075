pub mod cli;
pub mod config;
pub mod library;
pub mod lifecycle;
pub mod tui;
