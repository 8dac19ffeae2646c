//! Rule and grid error types.

use thiserror::Error;

/// Errors that can occur while building a [`RuleSet`](crate::RuleSet).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A neighbour count outside `0..=8`.
    #[error("neighbour count {0} is outside 0..=8")]
    CountOutOfRange(i64),

    /// Rule text that could not be parsed.
    #[error("malformed rule: {0}")]
    Malformed(String),
}

/// A grid shape that cannot hold its cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cells} cells do not fill a {width}x{height} grid")]
pub struct GridShapeError {
    /// Declared width.
    pub width: usize,
    /// Declared height.
    pub height: usize,
    /// Number of cells supplied.
    pub cells: usize,
}
