//! Intermediate serialization form.

use rhizome_verse_automata::{Grid, RuleSet};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::rle::{decode_cells, encode_cells};

/// Largest generation a decoded universe may start at.
///
/// Leaves room for the universe to keep advancing without the counter
/// wrapping.
pub const MAX_GENERATION: u64 = u64::MAX / 2;

/// Serializable snapshot of a universe's live state.
///
/// Cells are kept as an RLE body so that every format stays compact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialUniverse {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Rule in `B3/S23` notation.
    pub rule: String,
    /// Generation of the encoded grid.
    #[serde(default)]
    pub generation: u64,
    /// Run-length encoded cells.
    pub cells: String,
}

impl SerialUniverse {
    /// Captures a grid, rule and generation.
    pub fn from_parts(
        name: impl Into<String>,
        grid: &Grid,
        rules: &RuleSet,
        generation: u64,
    ) -> Self {
        Self {
            name: name.into(),
            width: grid.width(),
            height: grid.height(),
            rule: rules.to_string(),
            generation,
            cells: encode_cells(grid),
        }
    }

    /// Parses the rule and cells back into live values.
    pub fn into_decoded(self) -> Result<DecodedUniverse, CodecError> {
        if self.generation > MAX_GENERATION {
            return Err(CodecError::InvalidGeneration(self.generation));
        }
        let rules: RuleSet = self.rule.parse()?;
        let grid = decode_cells(self.width, self.height, &self.cells)?;
        Ok(DecodedUniverse {
            name: self.name,
            grid,
            rules,
            generation: self.generation,
        })
    }
}

/// A decoded universe: everything needed to seed a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUniverse {
    /// Display name (may be empty).
    pub name: String,
    /// Live grid.
    pub grid: Grid,
    /// Rule.
    pub rules: RuleSet,
    /// Generation of `grid`.
    pub generation: u64,
}
