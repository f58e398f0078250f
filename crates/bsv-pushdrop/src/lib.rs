#![deny(missing_docs)]

//! # bsv-pushdrop
//!
//! PushDrop tokens: application data embedded in a spendable output.
//!
//! A PushDrop locking script pushes each data field, optionally followed by
//! a signature over the fields, drops them all from the stack, and then
//! locks the output to a public key. The data is recorded on chain, the
//! author can be proven from the signature, and the owner spends the output
//! with a single signature.
//!
//! The crate exposes four operations:
//! - [`encode_push`]: the canonical push encoding of a byte string.
//! - [`create`]: build a locking script from fields.
//! - [`decode`]: recover fields, owner key and signature from a script.
//! - [`redeem`]: produce the unlocking script for a token output.
//!
//! Signing goes through [`SigningCapability`] and key lookup through
//! [`KeyResolutionCapability`]. [`Signer`] provides both, backed either by
//! a local key or by a wallet reached over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use bsv_pushdrop::{create, decode, CreateConfig, Field, FieldFormat, LocalKey, Signer};
//!
//! # async fn run() -> Result<(), bsv_pushdrop::PushDropError> {
//! let signer = Signer::from(LocalKey::from_wif(
//!     "5K4Wq578LC4nYd7oxnzxBcimtQguWJzV7W93UgcDKNL4C3vL5zu",
//! )?);
//! let fields = vec![Field::from("hello world"), Field::from("demo")];
//! let script = create(&fields, Some(&signer), &CreateConfig::default()).await?;
//!
//! let token = decode(&script, FieldFormat::Utf8)?;
//! assert_eq!(token.fields.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod create;
pub mod decode;
pub mod ec;
pub mod error;
pub mod field;
pub mod hash;
pub mod opcodes;
pub mod redeem;
pub mod script;
pub mod sighash;
pub mod signer;
pub mod util;


pub use chunk::{encode_push, ScriptChunk};
pub use create::{create, create_script, CreateConfig, LockPosition};
pub use decode::{
    decode, decode_script_token, decode_with_options, DecodeOptions, DecodedToken,
    SignaturePresence,
};
pub use ec::{PrivateKey, PublicKey, Signature};
pub use error::{PushDropError, WalletClientError};
pub use field::{Field, FieldFormat, FieldValue};
pub use redeem::{redeem, redeem_script, RedeemConfig};
pub use script::Script;
pub use sighash::{OutPoint, OutputCommitment};
pub use signer::{
    Counterparty, KeyResolutionCapability, KeySelection, LocalKey, Protocol, Signer,
    SigningCapability, WalletClient, WalletClientConfig,
};
