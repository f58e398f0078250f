//! In-process signing with a private key.

use crate::ec::{PrivateKey, PublicKey};
use crate::hash::sha256;
use crate::signer::{KeyResolutionCapability, KeySelection, SigningCapability};
use crate::PushDropError;

/// A signer backed by a private key held in memory.
///
/// Key-selection parameters are ignored: there is only one key.
#[derive(Debug, Clone)]
pub struct LocalKey {
    key: PrivateKey,
}

impl LocalKey {
    /// Wrap a private key.
    pub fn new(key: PrivateKey) -> Self {
        LocalKey { key }
    }

    /// Import a key from WIF.
    pub fn from_wif(wif: &str) -> Result<Self, PushDropError> {
        Ok(LocalKey::new(PrivateKey::from_wif(wif)?))
    }

    /// The wrapped private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// The public key, in the private key's compression mode.
    pub fn public_key(&self) -> PublicKey {
        self.key.pub_key()
    }
}

impl SigningCapability for LocalKey {
    async fn sign(&self, data: &[u8], _selection: &KeySelection) -> Result<Vec<u8>, PushDropError> {
        let sig = self.key.sign(&sha256(data))?;
        Ok(sig.to_der())
    }
}

impl KeyResolutionCapability for LocalKey {
    async fn resolve_public_key(&self, _selection: &KeySelection) -> Result<PublicKey, PushDropError> {
        Ok(self.public_key())
    }
}
