//! History error types.

use thiserror::Error;

/// Errors that can occur during history operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The generation was evicted, truncated, or never recorded.
    #[error("generation {requested} is not retained{}", describe(.retained))]
    OutOfRange {
        /// The generation that was asked for.
        requested: u64,
        /// Oldest and newest retained generations, if any are retained.
        retained: Option<(u64, u64)>,
    },
}

fn describe(retained: &Option<(u64, u64)>) -> String {
    match retained {
        Some((oldest, newest)) => format!(" (retained {}..={})", oldest, newest),
        None => " (history is empty)".to_string(),
    }
}
