//! Error types for PushDrop operations.

/// Errors that can occur while building, decoding or redeeming a PushDrop token.
///
/// Every variant carries a context message so callers can tell malformed
/// input apart from a failed or rejected signing call.
#[derive(Debug, thiserror::Error)]
pub enum PushDropError {
    /// The script text is not valid hexadecimal.
    #[error("invalid script: {0}")]
    InvalidScript(String),

    /// The script parsed into a chunk sequence that is not a PushDrop layout.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(String),

    /// The requested field output format is not supported.
    #[error("invalid field format: {0}")]
    InvalidFieldFormat(String),

    /// The signing capability rejected the request or failed.
    #[error("signing failed: {0}")]
    SigningFailure(String),

    /// A signature or lock was requested but no usable key or signer exists.
    #[error("missing key: {0}")]
    MissingKey(String),

    /// The key resolution capability rejected the request or failed.
    #[error("key resolution failed: {0}")]
    KeyResolutionFailure(String),

    /// A public key, private key or WIF string is malformed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A DER signature is malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A transaction id is not 32 bytes of hex.
    #[error("invalid txid: {0}")]
    InvalidTxid(String),

    /// Data is too long for a single push (more than `u32::MAX` bytes).
    #[error("data too big to push: {0} bytes")]
    DataTooBig(usize),
}

/// Errors from the HTTP wallet client.
///
/// These never reach callers directly: the token operations fold them into
/// [`PushDropError::SigningFailure`] or [`PushDropError::KeyResolutionFailure`]
/// with the endpoint name attached.
#[derive(Debug, thiserror::Error)]
pub enum WalletClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to serialize or deserialize data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The wallet answered with a non-success status.
    #[error("wallet rejected request ({status}): {description}")]
    Rejected {
        /// The HTTP status code.
        status: u16,
        /// Description from the error body, or the raw body.
        description: String,
    },
}
