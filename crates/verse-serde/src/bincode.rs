//! Binary universe snapshots.
//!
//! The cells stay RLE-compressed inside [`SerialUniverse`]; bincode only
//! frames the header fields, so a saved universe is a few bytes larger than
//! its RLE body. Use it for local save slots and IPC, and [`RleFormat`](crate::RleFormat)
//! for anything a person or Golly should read.

use ::bincode::config::{Configuration, standard};

use crate::error::CodecError;
use crate::format::UniverseFormat;
use crate::serial::SerialUniverse;

/// Varint-encoded binary snapshots of a universe.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFormat;

impl BincodeFormat {
    /// Creates the format.
    pub fn new() -> Self {
        Self
    }

    fn config() -> Configuration {
        standard()
    }
}

impl UniverseFormat for BincodeFormat {
    fn serialize(&self, universe: &SerialUniverse) -> Result<Vec<u8>, CodecError> {
        Ok(::bincode::serde::encode_to_vec(universe, Self::config())?)
    }

    /// Trailing bytes after a complete snapshot are ignored.
    fn deserialize(&self, bytes: &[u8]) -> Result<SerialUniverse, CodecError> {
        let (universe, _read) = ::bincode::serde::decode_from_slice(bytes, Self::config())?;
        Ok(universe)
    }

    fn name(&self) -> &'static str {
        "bincode"
    }

    fn extension(&self) -> &'static str {
        "bin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonFormat;
    use rhizome_verse_automata::{Grid, rules};

    fn sample() -> (Grid, SerialUniverse) {
        let mut grid = Grid::new(32, 32);
        grid.randomize(21, 0.5);
        let serial = SerialUniverse::from_parts("bin", &grid, &rules::REPLICATOR, 99);
        (grid, serial)
    }

    #[test]
    fn test_bincode_roundtrip() {
        let (grid, serial) = sample();
        let format = BincodeFormat::new();
        let bytes = format.serialize(&serial).unwrap();
        let loaded = format.deserialize(&bytes).unwrap();

        assert_eq!(loaded, serial);
        assert_eq!(loaded.into_decoded().unwrap().grid, grid);
    }

    #[test]
    fn test_bincode_smaller_than_json() {
        let (_, serial) = sample();
        let json_bytes = JsonFormat::new().serialize(&serial).unwrap();
        let bincode_bytes = BincodeFormat::new().serialize(&serial).unwrap();
        assert!(bincode_bytes.len() < json_bytes.len());
    }

    #[test]
    fn test_bincode_ignores_trailing_bytes() {
        let (_, serial) = sample();
        let mut bytes = BincodeFormat::new().serialize(&serial).unwrap();
        bytes.extend_from_slice(&[0xff, 0x00, 0x7f]);
        assert_eq!(BincodeFormat::new().deserialize(&bytes).unwrap(), serial);
    }

    #[test]
    fn test_bincode_rejects_truncated() {
        let (_, serial) = sample();
        let bytes = BincodeFormat::new().serialize(&serial).unwrap();
        assert!(matches!(
            BincodeFormat::new().deserialize(&bytes[..bytes.len() / 2]),
            Err(CodecError::Bincode(_))
        ));
    }
}
