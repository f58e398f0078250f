//! Building PushDrop locking scripts.
//!
//! A token script pushes every field (and, unless disabled, a signature over
//! the fields), drops them all again, and locks the output with either a
//! pay-to-public-key condition or a caller-supplied custom lock:
//!
//! ```text
//! <lock> <field 1> ... <field n> <signature> OP_2DROP ... [OP_DROP]
//! ```
//!
//! With [`LockPosition::After`] the lock follows the drops instead.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunk::ScriptChunk;
use crate::ec::PublicKey;
use crate::field::{concat_fields, Field};
use crate::opcodes::{OP_2DROP, OP_DROP};
use crate::script::Script;
use crate::signer::{KeyResolutionCapability, KeySelection, SigningCapability};
use crate::PushDropError;

/// Where the lock sits relative to the pushed and dropped fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockPosition {
    /// Lock first, then the fields.
    #[default]
    Before,
    /// Fields first, then the lock.
    After,
}

/// Options for [`create`].
#[derive(Debug, Clone, Default)]
pub struct CreateConfig {
    /// Key the P2PK lock pays to. Defaults to the signer's own key.
    pub owner_key: Option<PublicKey>,
    /// Lock bytes used verbatim instead of a P2PK lock.
    pub custom_lock: Option<Script>,
    /// Skip the signature field.
    pub disable_signature: bool,
    /// Lock placement.
    pub lock_position: LockPosition,
    /// Passed to the signer for signing and key resolution.
    pub key_selection: KeySelection,
}

/// Return the drop opcodes that clear `n` pushed elements.
///
/// `n / 2` OP_2DROPs followed by one OP_DROP when `n` is odd.
pub fn drop_opcodes(n: usize) -> Vec<ScriptChunk> {
    let mut drops = vec![ScriptChunk::opcode(OP_2DROP); n / 2];
    if n % 2 == 1 {
        drops.push(ScriptChunk::opcode(OP_DROP));
    }
    drops
}

/// Build a PushDrop locking script and return it as hex.
///
/// See [`create_script`].
pub async fn create<S>(
    fields: &[Field],
    signer: Option<&S>,
    config: &CreateConfig,
) -> Result<String, PushDropError>
where
    S: SigningCapability + KeyResolutionCapability,
{
    Ok(create_script(fields, signer, config).await?.to_hex())
}

/// Build a PushDrop locking script.
///
/// The lock is resolved first: the custom lock if one is set, otherwise a
/// P2PK lock to `owner_key`, otherwise to whatever key the signer resolves.
/// Then, unless signing is disabled, the signer is asked exactly once for a
/// signature over the concatenated field bytes, which is appended as an
/// extra field.
///
/// # Arguments
/// * `fields` - Token payload, in order.
/// * `signer` - Signs the payload and resolves the owner key.
/// * `config` - Lock and signing options.
///
/// # Returns
/// The script, `MissingKey` when a key is needed and nothing can supply
/// one, or the signer's failure unchanged.
pub async fn create_script<S>(
    fields: &[Field],
    signer: Option<&S>,
    config: &CreateConfig,
) -> Result<Script, PushDropError>
where
    S: SigningCapability + KeyResolutionCapability,
{
    debug!(
        fields = fields.len(),
        lock_position = ?config.lock_position,
        custom_lock = config.custom_lock.is_some(),
        signed = !config.disable_signature,
        "creating pushdrop script"
    );

    let lock = match (&config.custom_lock, &config.owner_key, signer) {
        (Some(custom), _, _) => custom.clone(),
        (None, Some(owner), _) => Script::new_p2pk(owner)?,
        (None, None, Some(signer)) => {
            let owner = signer.resolve_public_key(&config.key_selection).await?;
            Script::new_p2pk(&owner)?
        }
        (None, None, None) => {
            return Err(PushDropError::MissingKey(
                "no custom lock, owner key or signer to derive the lock from".to_string(),
            ))
        }
    };

    let signature = if config.disable_signature {
        None
    } else {
        let signer = signer.ok_or_else(|| {
            PushDropError::MissingKey("signature requested but no signer given".to_string())
        })?;
        Some(
            signer
                .sign(&concat_fields(fields), &config.key_selection)
                .await?,
        )
    };

    let mut pushes: Vec<&[u8]> = fields.iter().map(Field::as_bytes).collect();
    if let Some(signature) = &signature {
        pushes.push(signature);
    }

    let mut chunks = pushes
        .iter()
        .map(|data| ScriptChunk::minimal_push(data))
        .collect::<Result<Vec<_>, _>>()?;
    chunks.extend(drop_opcodes(pushes.len()));
    let payload = Script::from_chunks(&chunks);

    let mut script = Script::new();
    match config.lock_position {
        LockPosition::Before => {
            script.append(&lock);
            script.append(&payload);
        }
        LockPosition::After => {
            script.append(&payload);
            script.append(&lock);
        }
    }
    Ok(script)
}
