//! Recovering fields, owner key and signature from a PushDrop script.

use serde::{Deserialize, Serialize};

use crate::chunk::ScriptChunk;
use crate::create::LockPosition;
use crate::ec::Signature;
use crate::field::{FieldFormat, FieldValue};
use crate::opcodes::{is_drop, opcode_name, OP_CHECKSIG};
use crate::script::Script;
use crate::PushDropError;

/// How to decide whether the last pushed element is a signature.
///
/// A signed token and an unsigned token whose last field is itself a DER
/// signature have identical scripts, so no rule can tell them apart from
/// the bytes alone. Callers that know how a token was built should say so
/// with `Present` or `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignaturePresence {
    /// The element before the drops is a signature only if it parses as
    /// strict DER. Unsigned tokens decode without one unless their last
    /// field is DER, in which case that field is reported as the signature.
    #[default]
    Detect,
    /// The element before the drops is always the signature.
    Present,
    /// Every pushed element is a field.
    Absent,
}

/// Options for [`decode_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Format the fields are returned in.
    pub field_format: FieldFormat,
    /// Signature handling.
    pub signature: SignaturePresence,
}

/// A decoded PushDrop token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    /// Data fields in order, signature excluded.
    pub fields: Vec<FieldValue>,
    /// Hex of the key pushed in the lock.
    pub locking_public_key: String,
    /// Hex of the DER signature over the fields, if the token carries one.
    pub signature: Option<String>,
    /// Where the lock was found.
    pub lock_position: LockPosition,
}

/// Decode a hex PushDrop script, returning fields in `format`.
///
/// Uses [`SignaturePresence::Detect`]. For a token created with signing
/// disabled whose last field may be a DER signature, use
/// [`decode_with_options`] with [`SignaturePresence::Absent`] to keep that
/// field.
pub fn decode(script_hex: &str, format: FieldFormat) -> Result<DecodedToken, PushDropError> {
    decode_with_options(
        script_hex,
        &DecodeOptions {
            field_format: format,
            ..Default::default()
        },
    )
}

/// Decode a hex PushDrop script.
///
/// # Returns
/// The token, `InvalidScript` for malformed hex, or `InvalidOpcode` when
/// the chunks do not form a PushDrop layout.
pub fn decode_with_options(
    script_hex: &str,
    options: &DecodeOptions,
) -> Result<DecodedToken, PushDropError> {
    decode_script_token(&Script::from_hex(script_hex)?, options)
}

/// Decode a parsed PushDrop script.
///
/// The lock is located first. A key push followed by OP_CHECKSIG at the
/// start means the lock comes first; a key push and OP_CHECKSIG at the end
/// means it comes last. Anything else is read with the lock-first layout,
/// taking chunk 0 as the key and chunk 1 as the lock opcode.
///
/// The remaining chunks must be pushes followed by drops. Reaching the end
/// without a drop is valid and means the token has no signature.
pub fn decode_script_token(
    script: &Script,
    options: &DecodeOptions,
) -> Result<DecodedToken, PushDropError> {
    let chunks = script.chunks()?;
    let (lock_position, key_index, region) = locate_lock(&chunks)?;
    let key = push_bytes(&chunks[key_index], key_index)?;
    let offset = match lock_position {
        LockPosition::Before => 2,
        LockPosition::After => 0,
    };

    let first_drop = region.iter().position(|c| is_drop(c.op));
    let (pushes, drops) = region.split_at(first_drop.unwrap_or(region.len()));
    if let Some((i, chunk)) = drops.iter().enumerate().find(|(_, c)| !is_drop(c.op)) {
        return Err(PushDropError::InvalidOpcode(format!(
            "{} at chunk {} follows the drop opcodes",
            opcode_name(chunk.op),
            offset + pushes.len() + i
        )));
    }

    let mut values = pushes
        .iter()
        .enumerate()
        .map(|(i, chunk)| push_bytes(chunk, offset + i))
        .collect::<Result<Vec<_>, _>>()?;

    let signed = !drops.is_empty()
        && match options.signature {
            SignaturePresence::Detect => values.last().is_some_and(|v| Signature::is_der(v)),
            SignaturePresence::Present => !values.is_empty(),
            SignaturePresence::Absent => false,
        };
    let signature = if signed {
        values.pop().map(hex::encode)
    } else {
        None
    };

    Ok(DecodedToken {
        fields: values
            .into_iter()
            .map(|v| options.field_format.format(v))
            .collect(),
        locking_public_key: hex::encode(key),
        signature,
        lock_position,
    })
}

/// Find the lock and return its position, the index of the key chunk and
/// the chunks holding fields and drops.
fn locate_lock(
    chunks: &[ScriptChunk],
) -> Result<(LockPosition, usize, &[ScriptChunk]), PushDropError> {
    let n = chunks.len();
    if n < 2 {
        return Err(PushDropError::InvalidOpcode(format!(
            "expected a key and a lock opcode, found {n} chunk(s)"
        )));
    }
    if chunks[1].op != OP_CHECKSIG && chunks[n - 1].op == OP_CHECKSIG && chunks[n - 2].is_push() {
        return Ok((LockPosition::After, n - 2, &chunks[..n - 2]));
    }
    Ok((LockPosition::Before, 0, &chunks[2..]))
}

fn push_bytes(chunk: &ScriptChunk, index: usize) -> Result<Vec<u8>, PushDropError> {
    chunk.pushed_bytes().ok_or_else(|| {
        PushDropError::InvalidOpcode(format!(
            "expected a push at chunk {index}, found {}",
            opcode_name(chunk.op)
        ))
    })
}
