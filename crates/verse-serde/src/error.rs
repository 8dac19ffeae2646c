//! Codec error types.

use rhizome_verse_automata::RuleError;
use thiserror::Error;

/// Errors that can occur while encoding or decoding a universe.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The `x = .., y = ..` header line is missing.
    #[error("missing RLE header")]
    MissingHeader,

    /// The header line could not be parsed.
    #[error("invalid RLE header: {0}")]
    InvalidHeader(String),

    /// Grid dimensions are zero or too large.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
    },

    /// The generation is past [`MAX_GENERATION`](crate::MAX_GENERATION).
    #[error("generation {0} is too large to resume from")]
    InvalidGeneration(u64),

    /// The rule string could not be parsed.
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    /// A run extends past the declared grid.
    #[error("run at ({x}, {y}) extends past the grid")]
    RunOutOfBounds {
        /// Column where the run starts.
        x: usize,
        /// Row where the run starts.
        y: usize,
    },

    /// A run count does not fit in memory.
    #[error("run count overflow")]
    CountOverflow,

    /// A run count with no cell tag after it.
    #[error("run count without a cell tag")]
    DanglingCount,

    /// A character that is not part of the RLE alphabet.
    #[error("unexpected character {0:?} in cell data")]
    UnexpectedChar(char),

    /// Input is not UTF-8.
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bincode deserialization error.
    #[error("bincode error: {0}")]
    Bincode(#[from] ::bincode::error::DecodeError),

    /// Bincode encoding error.
    #[error("bincode encode error: {0}")]
    BincodeEncode(#[from] ::bincode::error::EncodeError),
}
