//! secp256k1 public key that keeps its SEC1 encoding mode.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::ec::signature::Signature;
use crate::PushDropError;

/// Length of a compressed public key in bytes.
const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes.
const UNCOMPRESSED_LEN: usize = 65;

/// A secp256k1 public key.
///
/// PushDrop locks embed the key bytes verbatim, so a key parsed from a
/// 65-byte encoding serializes back to 65 bytes.
#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: VerifyingKey,
    compressed: bool,
}

impl PublicKey {
    pub(crate) fn from_verifying_key(inner: VerifyingKey, compressed: bool) -> Self {
        PublicKey { inner, compressed }
    }

    /// Parse a SEC1 encoded key (33-byte compressed or 65-byte uncompressed).
    ///
    /// # Returns
    /// The key, or `InvalidKey` if the bytes are not a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PushDropError> {
        let compressed = match bytes.len() {
            COMPRESSED_LEN => true,
            UNCOMPRESSED_LEN => false,
            len => {
                return Err(PushDropError::InvalidKey(format!(
                    "public key must be {COMPRESSED_LEN} or {UNCOMPRESSED_LEN} bytes, got {len}"
                )))
            }
        };
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PushDropError::InvalidKey(format!("invalid public key: {e}")))?;
        Ok(PublicKey { inner, compressed })
    }

    /// Parse a hex-encoded SEC1 key.
    pub fn from_hex(hex_str: &str) -> Result<Self, PushDropError> {
        let bytes =
            hex::decode(hex_str).map_err(|e| PushDropError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the key in its own encoding mode.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner
            .as_affine()
            .to_encoded_point(self.compressed)
            .as_bytes()
            .to_vec()
    }

    /// Serialize the key as 33 compressed bytes.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(self.inner.as_affine().to_encoded_point(true).as_bytes());
        out
    }

    /// Hex of [`PublicKey::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Whether this key serializes to the 33-byte form.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Verify a signature over a 32-byte digest.
    pub fn verify(&self, digest: &[u8; 32], sig: &Signature) -> bool {
        sig.verify(digest, &self.inner)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.compressed == other.compressed && self.inner == other.inner
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl serde::Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
