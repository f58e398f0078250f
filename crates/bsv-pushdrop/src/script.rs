//! Script type wrapping raw script bytes.
//!
//! Provides the `Script` newtype with hex conversion, chunk parsing and
//! serialization, plus the pay-to-public-key lock used by PushDrop tokens.

use std::fmt;

use crate::chunk::{decode_script, encode_chunks, ScriptChunk};
use crate::ec::PublicKey;
use crate::opcodes::*;
use crate::PushDropError;

/// A script, stored as its raw bytes.
///
/// Locking scripts, unlocking scripts and custom locks are all carried as
/// `Script`. Conversion to and from hex is the wire format.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Parse a script from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex-encoded script bytes (upper or lower case).
    ///
    /// # Returns
    /// The script, or `InvalidScript` if the text is not valid hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, PushDropError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| PushDropError::InvalidScript(format!("{e} in {hex_str:?}")))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Serialize a chunk sequence into a script.
    pub fn from_chunks(chunks: &[ScriptChunk]) -> Self {
        Script(encode_chunks(chunks))
    }

    /// Build the pay-to-public-key lock `<pubkey> OP_CHECKSIG`.
    ///
    /// The key is pushed in the encoding it carries, so an uncompressed key
    /// produces a 65-byte push.
    pub fn new_p2pk(pub_key: &PublicKey) -> Result<Self, PushDropError> {
        let chunks = [
            ScriptChunk::minimal_push(&pub_key.to_bytes())?,
            ScriptChunk::opcode(OP_CHECKSIG),
        ];
        Ok(Script::from_chunks(&chunks))
    }

    /// Return the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the raw script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the script length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the script into chunks.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, PushDropError> {
        decode_script(&self.0)
    }

    /// Append the bytes of another script verbatim.
    pub fn append(&mut self, other: &Script) {
        self.0.extend_from_slice(&other.0);
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
