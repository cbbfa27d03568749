//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, status) and shared utilities (open_db, load_config)
//! - `insights` - One command per insight engine analysis

pub mod core;
pub mod insights;

// Re-export command functions for main.rs
pub use core::*;
pub use insights::*;

/// How a command prints its report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON report
    Json,
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
