//! Infrastructure layer
//!
//! - Configuration and CLI processing
//! - Simulated module providers
//! - TUI foundation

pub mod cli;
pub mod config;
pub mod modules;
pub mod tui;
