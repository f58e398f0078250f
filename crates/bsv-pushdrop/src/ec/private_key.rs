//! secp256k1 private key with WIF import.

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::sha256d;
use crate::PushDropError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Trailing WIF byte marking a key whose public key is compressed.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key.
///
/// Keys imported from an uncompressed WIF produce uncompressed public keys;
/// every other constructor produces compressed ones.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
    compressed: bool,
}

impl PrivateKey {
    /// Generate a random private key.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
            compressed: true,
        }
    }

    /// Create a private key from 32 raw big-endian bytes.
    ///
    /// # Returns
    /// The key, or `InvalidKey` if the bytes are not a valid scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PushDropError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PushDropError::InvalidKey(format!(
                "private key must be {PRIVATE_KEY_BYTES_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PushDropError::InvalidKey(e.to_string()))?;
        Ok(PrivateKey { inner, compressed: true })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PushDropError> {
        let bytes =
            hex::decode(hex_str).map_err(|e| PushDropError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Decode a WIF (Wallet Import Format) string.
    ///
    /// Accepts both the 37-byte uncompressed and the 38-byte compressed
    /// payloads, and verifies the double-SHA-256 checksum. The network
    /// prefix byte is not checked.
    ///
    /// # Arguments
    /// * `wif` - Base58Check-encoded key.
    ///
    /// # Returns
    /// The key, or `InvalidKey` describing what is wrong with the string.
    pub fn from_wif(wif: &str) -> Result<Self, PushDropError> {
        let decoded = bs58::decode(wif)
            .into_vec()
            .map_err(|e| PushDropError::InvalidKey(format!("malformed WIF: {e}")))?;

        // prefix + key (+ compression flag) + 4 byte checksum
        let compressed = match decoded.len() {
            38 if decoded[33] == COMPRESS_MAGIC => true,
            38 => {
                return Err(PushDropError::InvalidKey(
                    "malformed WIF: invalid compression flag".to_string(),
                ))
            }
            37 => false,
            len => {
                return Err(PushDropError::InvalidKey(format!(
                    "malformed WIF: invalid length {len}"
                )))
            }
        };

        let payload_end = decoded.len() - 4;
        let checksum = sha256d(&decoded[..payload_end]);
        if checksum[..4] != decoded[payload_end..] {
            return Err(PushDropError::InvalidKey(
                "malformed WIF: checksum mismatch".to_string(),
            ));
        }

        let mut key = Self::from_bytes(&decoded[1..1 + PRIVATE_KEY_BYTES_LEN])?;
        key.compressed = compressed;
        Ok(key)
    }

    /// Return the raw 32-byte scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Whether the derived public key uses the 33-byte encoding.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Derive the public key, in this key's compression mode.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(VerifyingKey::from(&self.inner), self.compressed)
    }

    /// Sign a 32-byte digest with an RFC6979 deterministic nonce.
    ///
    /// The result is normalized to low-S.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, PushDropError> {
        Signature::sign(digest, &self.inner)
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey({})", self.pub_key())
    }
}
