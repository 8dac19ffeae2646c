//! Serialization for cellular universes.
//!
//! A universe is converted to an intermediate [`SerialUniverse`] whose cells
//! are a run-length encoded string, then written by a [`UniverseFormat`]:
//!
//! - [`RleFormat`]: Golly-compatible `.rle` text (the default share format)
//! - [`JsonFormat`]: human-readable JSON
//! - [`BincodeFormat`]: compact binary
//!
//! Every format round-trips the grid bit for bit.
//!
//! # Example
//!
//! ```
//! use rhizome_verse_automata::{Grid, RuleSet, patterns};
//! use rhizome_verse_serde::{SerialUniverse, decode, encode};
//!
//! let mut grid = Grid::new(10, 10);
//! grid.stamp(&patterns::GLIDER, 1, 1);
//!
//! let serial = SerialUniverse::from_parts("demo", &grid, &RuleSet::life(), 7);
//! let text = encode(&serial);
//! let decoded = decode(&text).unwrap();
//!
//! assert_eq!(decoded.grid, grid);
//! assert_eq!(decoded.generation, 7);
//! ```

mod bincode;
mod error;
mod format;
mod json;
mod rle;
mod serial;

pub use crate::bincode::BincodeFormat;
pub use crate::error::CodecError;
pub use crate::format::UniverseFormat;
pub use crate::json::JsonFormat;
pub use crate::rle::{MAX_CELLS, RleFormat, decode_cells, encode_cells};
pub use crate::serial::{DecodedUniverse, MAX_GENERATION, SerialUniverse};

/// Encodes a universe as RLE text.
pub fn encode(universe: &SerialUniverse) -> String {
    RleFormat::new().to_text(universe)
}

/// Decodes RLE text into a grid, rule and generation.
pub fn decode(text: &str) -> Result<DecodedUniverse, CodecError> {
    RleFormat::new().from_text(text)?.into_decoded()
}
