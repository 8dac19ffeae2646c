//! Generation history for cellular universes.
//!
//! A [`HistoryLedger`] stores one [`Grid`](rhizome_verse_automata::Grid)
//! snapshot per generation, evicting the oldest snapshot once its capacity
//! is reached. Reads by generation number fail with
//! [`HistoryError::OutOfRange`] rather than clamping to the retained window.

mod error;
mod ledger;

pub use crate::error::HistoryError;
pub use crate::ledger::{DEFAULT_CAPACITY, HistoryLedger, LedgerConfig};
