//! Multiverse error types.

use rhizome_verse_automata::RuleError;
use rhizome_verse_history::HistoryError;
use rhizome_verse_serde::CodecError;
use thiserror::Error;

use crate::universe::UniverseId;

/// Errors that can occur during multiverse operations.
///
/// A failed operation never leaves partial changes behind.
#[derive(Debug, Error)]
pub enum MultiverseError {
    /// Time travel or history access outside the retained window.
    #[error(transparent)]
    OutOfRange(#[from] HistoryError),

    /// A rule count outside `0..=8`, or unparseable rule text.
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    /// No universe with this id.
    #[error("universe not found: {0}")]
    NotFound(UniverseId),

    /// A rule advisor returned something that is not a valid rule.
    #[error("malformed rule proposal: {0}")]
    MalformedRuleProposal(RuleError),

    /// The active universe cannot be removed without a replacement.
    #[error("universe {0} is active; switch away or name a fallback before removing it")]
    ActiveUniverse(UniverseId),

    /// Configuration values that cannot describe a universe.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
