//! JSON format implementation.

use crate::error::CodecError;
use crate::format::UniverseFormat;
use crate::serial::SerialUniverse;

/// JSON serialization format.
///
/// Human-readable; pretty output is convenient for hand-editing saved
/// universes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    /// Creates a compact JsonFormat.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Creates a JsonFormat with indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl UniverseFormat for JsonFormat {
    fn serialize(&self, universe: &SerialUniverse) -> Result<Vec<u8>, CodecError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(universe)?
        } else {
            serde_json::to_vec(universe)?
        };
        Ok(bytes)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<SerialUniverse, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
