//! ECDSA signatures with DER serialization.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{self, SigningKey, VerifyingKey};

use crate::PushDropError;

/// An ECDSA secp256k1 signature, always held in low-S form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature(ecdsa::Signature);

impl Signature {
    /// Parse a strict DER-encoded signature.
    ///
    /// High-S signatures are accepted and normalized, so re-serializing a
    /// parsed signature always yields canonical low-S DER.
    ///
    /// # Returns
    /// The signature, or `InvalidSignature` if the encoding is not strict DER
    /// or either scalar is out of range.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PushDropError> {
        let sig = ecdsa::Signature::from_der(bytes)
            .map_err(|e| PushDropError::InvalidSignature(format!("malformed DER: {e}")))?;
        Ok(Signature(sig.normalize_s().unwrap_or(sig)))
    }

    /// Check whether `bytes` is exactly one strict DER signature.
    pub fn is_der(bytes: &[u8]) -> bool {
        Self::from_der(bytes).is_ok()
    }

    /// Serialize as DER.
    pub fn to_der(&self) -> Vec<u8> {
        self.0.to_der().as_bytes().to_vec()
    }

    pub(crate) fn sign(digest: &[u8; 32], key: &SigningKey) -> Result<Self, PushDropError> {
        let sig: ecdsa::Signature = key
            .sign_prehash(digest)
            .map_err(|e| PushDropError::SigningFailure(e.to_string()))?;
        Ok(Signature(sig.normalize_s().unwrap_or(sig)))
    }

    pub(crate) fn verify(&self, digest: &[u8; 32], key: &VerifyingKey) -> bool {
        key.verify_prehash(digest, &self.0).is_ok()
    }
}
