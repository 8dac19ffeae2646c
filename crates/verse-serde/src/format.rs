//! Format trait.

use crate::error::CodecError;
use crate::serial::SerialUniverse;

/// A wire format for [`SerialUniverse`].
pub trait UniverseFormat {
    /// Serializes a universe to bytes.
    fn serialize(&self, universe: &SerialUniverse) -> Result<Vec<u8>, CodecError>;

    /// Deserializes a universe from bytes.
    fn deserialize(&self, bytes: &[u8]) -> Result<SerialUniverse, CodecError>;

    /// Format name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Conventional file extension, without the dot.
    fn extension(&self) -> &'static str;
}
