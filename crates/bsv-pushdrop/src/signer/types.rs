//! Key-selection parameters passed to signing and key-resolution calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ec::PublicKey;

/// Security level for wallet operations.
pub type SecurityLevel = i32;

/// Silent security level, no user prompts required.
pub const SECURITY_LEVEL_SILENT: SecurityLevel = 0;
/// Prompt the user once per application.
pub const SECURITY_LEVEL_EVERY_APP: SecurityLevel = 1;
/// Prompt the user per application and per counterparty.
pub const SECURITY_LEVEL_EVERY_APP_AND_COUNTERPARTY: SecurityLevel = 2;

/// Protocol identifier with security level and name.
///
/// Serializes as the two-element array `[security_level, "name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Protocol {
    /// The security level required by this protocol.
    pub security_level: SecurityLevel,
    /// The protocol name (e.g. "todo list").
    pub protocol: String,
}

impl Protocol {
    /// Create a protocol identifier.
    pub fn new(security_level: SecurityLevel, protocol: impl Into<String>) -> Self {
        Protocol {
            security_level,
            protocol: protocol.into(),
        }
    }
}

impl Serialize for Protocol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.security_level, &self.protocol).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Protocol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (security_level, protocol) = <(SecurityLevel, String)>::deserialize(deserializer)?;
        Ok(Protocol {
            security_level,
            protocol,
        })
    }
}

/// The party a derived key is shared with.
///
/// Serializes as `"self"`, `"anyone"` or the counterparty's public key hex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Counterparty {
    /// The wallet owner.
    #[default]
    Self_,
    /// Anyone; the derived key is publicly computable.
    Anyone,
    /// A specific identity key.
    Other(PublicKey),
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counterparty::Self_ => write!(f, "self"),
            Counterparty::Anyone => write!(f, "anyone"),
            Counterparty::Other(key) => write!(f, "{key}"),
        }
    }
}

impl Serialize for Counterparty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Counterparty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "self" => Ok(Counterparty::Self_),
            "anyone" => Ok(Counterparty::Anyone),
            hex_key => PublicKey::from_hex(hex_key)
                .map(Counterparty::Other)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Which key a signing capability should use.
///
/// A local key ignores all of this; a remote wallet uses it to derive the
/// key and to decide whether the user must approve the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySelection {
    /// The protocol under which the key is derived.
    pub protocol_id: Protocol,
    /// Application-specific key identifier.
    pub key_id: String,
    /// Who else can derive the key.
    pub counterparty: Counterparty,
    /// Use the privileged keyring instead of the primary one.
    pub privileged: bool,
    /// Shown to the user when permission is needed.
    pub description: Option<String>,
    /// Resolve the key as owned by the creator, so the counterparty can
    /// verify ownership.
    pub for_self: bool,
}
