//! Signing and key-resolution capabilities.
//!
//! Token creation and redemption never touch key material directly. They
//! ask a [`SigningCapability`] for signatures and a
//! [`KeyResolutionCapability`] for the owner's public key. Two
//! implementations ship with the crate: [`LocalKey`], which holds a private
//! key in memory, and [`WalletClient`], which forwards requests to a wallet
//! over HTTP. [`Signer`] picks one of the two at call time.

pub mod local;
pub mod remote;
pub mod types;

use std::future::Future;

pub use local::LocalKey;
pub use remote::{WalletClient, WalletClientConfig};
pub use types::{Counterparty, KeySelection, Protocol, SecurityLevel};

use crate::ec::{PrivateKey, PublicKey};
use crate::PushDropError;

/// Produces ECDSA signatures.
pub trait SigningCapability {
    /// Sign `sha256(data)` with the key chosen by `selection`.
    ///
    /// # Returns
    /// A DER-encoded signature, or `SigningFailure`.
    fn sign(
        &self,
        data: &[u8],
        selection: &KeySelection,
    ) -> impl Future<Output = Result<Vec<u8>, PushDropError>> + Send;
}

/// Resolves the public key that a PushDrop lock pays to.
pub trait KeyResolutionCapability {
    /// Return the public key chosen by `selection`.
    ///
    /// # Returns
    /// The key, or `KeyResolutionFailure`.
    fn resolve_public_key(
        &self,
        selection: &KeySelection,
    ) -> impl Future<Output = Result<PublicKey, PushDropError>> + Send;
}

/// A signer chosen once by the caller: a local key or a remote wallet.
#[derive(Debug, Clone)]
pub enum Signer {
    /// Sign in-process with a private key.
    LocalKey(LocalKey),
    /// Forward signing and key lookups to a wallet service.
    RemoteOracle(WalletClient),
}

impl From<LocalKey> for Signer {
    fn from(key: LocalKey) -> Self {
        Signer::LocalKey(key)
    }
}

impl From<PrivateKey> for Signer {
    fn from(key: PrivateKey) -> Self {
        Signer::LocalKey(LocalKey::new(key))
    }
}

impl From<WalletClient> for Signer {
    fn from(client: WalletClient) -> Self {
        Signer::RemoteOracle(client)
    }
}

impl SigningCapability for Signer {
    async fn sign(&self, data: &[u8], selection: &KeySelection) -> Result<Vec<u8>, PushDropError> {
        match self {
            Signer::LocalKey(key) => key.sign(data, selection).await,
            Signer::RemoteOracle(client) => client.sign(data, selection).await,
        }
    }
}

impl KeyResolutionCapability for Signer {
    async fn resolve_public_key(&self, selection: &KeySelection) -> Result<PublicKey, PushDropError> {
        match self {
            Signer::LocalKey(key) => key.resolve_public_key(selection).await,
            Signer::RemoteOracle(client) => client.resolve_public_key(selection).await,
        }
    }
}
