//! secp256k1 keys and ECDSA signatures.
//!
//! Thin wrappers over `k256` that keep the Bitcoin conventions PushDrop
//! relies on: WIF import, keys that remember whether they are compressed,
//! DER signatures normalized to low-S.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
