//! Unlocking a PushDrop output.
//!
//! A token created with a P2PK lock is spent by a single signature. The
//! signature covers only the input being spent and, optionally, one output
//! that must appear at the same index in the spending transaction. Whoever
//! assembles that transaction may add any other inputs and outputs.

use tracing::debug;

use crate::chunk::ScriptChunk;
use crate::ec::Signature;
use crate::hash::sha256;
use crate::script::Script;
use crate::sighash::{
    OutPoint, OutputCommitment, SigningContext, SIGHASH_NONE_ANYONECANPAY_FORKID,
    SIGHASH_SINGLE_ANYONECANPAY_FORKID,
};
use crate::signer::{KeySelection, SigningCapability};
use crate::PushDropError;

/// The output to redeem and how to sign for it.
#[derive(Debug, Clone, Default)]
pub struct RedeemConfig {
    /// Id of the transaction holding the token, in display (reversed) hex.
    pub prev_txid: String,
    /// Index of the token output in that transaction.
    pub output_index: u32,
    /// The token's locking script.
    pub locking_script: Script,
    /// The token output's value.
    pub satoshis: u64,
    /// An output the signature commits to. Without one the signature
    /// authorizes the input regardless of outputs.
    pub commitment: Option<OutputCommitment>,
    /// Slot the input will occupy in the spending transaction. The
    /// commitment output must sit at the same index.
    pub input_index: u32,
    /// Passed to the signer.
    pub key_selection: KeySelection,
}

impl RedeemConfig {
    /// The sighash flags this redemption signs with.
    pub fn sighash_type(&self) -> u32 {
        if self.commitment.is_some() {
            SIGHASH_SINGLE_ANYONECANPAY_FORKID
        } else {
            SIGHASH_NONE_ANYONECANPAY_FORKID
        }
    }
}

/// Produce the unlocking script for a PushDrop output, as hex.
///
/// See [`redeem_script`].
pub async fn redeem<S: SigningCapability>(
    config: &RedeemConfig,
    signer: &S,
) -> Result<String, PushDropError> {
    Ok(redeem_script(config, signer).await?.to_hex())
}

/// Produce the unlocking script for a PushDrop output.
///
/// The signer receives `sha256(preimage)` and signs its sha256, so the
/// signature is over the standard FORKID digest. The returned signature is
/// normalized to low-S DER, the flag byte appended, and the result pushed
/// as the only element of the script.
///
/// # Returns
/// The unlocking script, `InvalidTxid` for a malformed `prev_txid`, or
/// `SigningFailure` if the signer fails or returns something that is not a
/// DER signature.
pub async fn redeem_script<S: SigningCapability>(
    config: &RedeemConfig,
    signer: &S,
) -> Result<Script, PushDropError> {
    let outpoint = OutPoint::from_txid_hex(&config.prev_txid, config.output_index)?;
    let sighash_type = config.sighash_type();
    debug!(
        txid = %config.prev_txid,
        vout = config.output_index,
        input_index = config.input_index,
        sighash_type = format_args!("{sighash_type:#04x}"),
        "redeeming pushdrop output"
    );

    let context = SigningContext::new(outpoint, config.commitment.clone());
    let preimage = context.preimage(
        config.locking_script.to_bytes(),
        config.satoshis,
        sighash_type,
    );
    let der = signer
        .sign(&sha256(&preimage), &config.key_selection)
        .await?;
    let signature = Signature::from_der(&der).map_err(|e| {
        PushDropError::SigningFailure(format!("signer returned an unusable signature: {e}"))
    })?;

    let mut unlocking = signature.to_der();
    unlocking.push(sighash_type as u8);
    Ok(Script::from_chunks(&[ScriptChunk::minimal_push(&unlocking)?]))
}

#[cfg(test)]
mod tests {
    //! Tests for redemption.
    //!
    //! The three fixed vectors spend output 2 of the same funding
    //! transaction, holding the signed five-field token.

    use super::*;
    use crate::ec::PublicKey;
    use crate::signer::{LocalKey, Signer};

    const WIF: &str = "5K4Wq578LC4nYd7oxnzxBcimtQguWJzV7W93UgcDKNL4C3vL5zu";
    const PUB: &str = "04c9d0ddc86380f42c2126e1b71d1006495a1d952189e42b65b087c98286d14182c27b3dba5feb2bce841aef8d88295e6bf5a0be36734874ec72fac4161c021c31";
    const TOKEN: &str = "4104c9d0ddc86380f42c2126e1b71d1006495a1d952189e42b65b087c98286d14182c27b3dba5feb2bce841aef8d88295e6bf5a0be36734874ec72fac4161c021c31ac06deadbeef20200b68656c6c6f20776f726c640f546869732069732061206669656c641c6865726520636f6d6573206669656c64206e756d62657220666f7572136669656c642035206973206120627566666572463044022032d1b9d2747863f718c737952208cf276535cbb9aa306fe4f6149f3d63e3769a022043b6f6226f14b0a05ec15ee7ce78a1300c734999398054349e85b94a0b9a74486d6d6d";
    const TXID: &str = "7f69c4a9d3daf04686ac6c00db1d7650c5f44dd8fbe7704d0c3c86a0350de0c9";

    fn signer() -> Signer {
        Signer::from(LocalKey::from_wif(WIF).expect("valid WIF"))
    }

    fn config(commitment: Option<OutputCommitment>) -> RedeemConfig {
        RedeemConfig {
            prev_txid: TXID.to_string(),
            output_index: 2,
            locking_script: Script::from_hex(TOKEN).expect("hex"),
            satoshis: 133_700,
            commitment,
            ..Default::default()
        }
    }

    fn p2pk_commitment(satoshis: u64) -> OutputCommitment {
        let key = PublicKey::from_hex(PUB).expect("valid key");
        OutputCommitment {
            script: Script::new_p2pk(&key).expect("p2pk"),
            satoshis,
        }
    }

    /// Split an unlocking script into its signature and flag byte.
    fn unpack(unlocking: &str) -> (Signature, u8) {
        let script = Script::from_hex(unlocking).expect("hex");
        let chunks = script.chunks().expect("chunks");
        assert_eq!(chunks.len(), 1);
        let data = chunks[0].data.as_ref().expect("push");
        let (flag, der) = data.split_last().expect("non-empty");
        (Signature::from_der(der).expect("DER"), *flag)
    }

    /// Check the unlocking signature against the digest for `config`.
    fn verifies(unlocking: &str, config: &RedeemConfig) -> bool {
        let (signature, flag) = unpack(unlocking);
        let outpoint = OutPoint::from_txid_hex(&config.prev_txid, config.output_index).expect("txid");
        let digest = SigningContext::new(outpoint, config.commitment.clone()).signature_hash(
            config.locking_script.to_bytes(),
            config.satoshis,
            flag as u32,
        );
        PublicKey::from_hex(PUB)
            .expect("valid key")
            .verify(&digest, &signature)
    }

    // -----------------------------------------------------------------------
    // Fixed vectors
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_redeem_without_commitment() {
        let unlocking = redeem(&config(None), &signer()).await.expect("redeem");
        assert_eq!(
            unlocking,
            "483045022100ae639dc57af54b9f3b812add42451c8c05912ddad7a286cd5930e65751330f9c02205f64b42e2890a15ca644863acb39a04bd3627454b371ba38802b65a87b2b2ebec2"
        );
    }

    #[tokio::test]
    async fn test_redeem_with_p2pk_commitment() {
        let unlocking = redeem(&config(Some(p2pk_commitment(9000))), &signer())
            .await
            .expect("redeem");
        assert_eq!(
            unlocking,
            "4830450221009708667f3624251fb9831454d21b9ab23e7cb26b82f6b287c2ff1ce0b82773f6022044952d785acb4b836cc6e1c70fcdfef0a9600122ac7be5bbe8de2b8f9a13fc6ac3"
        );
    }

    #[tokio::test]
    async fn test_redeem_with_op_return_commitment() {
        let commitment = OutputCommitment {
            script: Script::from_hex("006a").expect("hex"),
            satoshis: 1,
        };
        let unlocking = redeem(&config(Some(commitment)), &signer())
            .await
            .expect("redeem");
        assert_eq!(
            unlocking,
            "483045022100d3ea7a99c031a54fdf34aefc0245b208b0cae19cea28a9e00cf07f0d6c8d6b0502203399d142b1fb1601bd812aa35a2343a037e6ac26fee6b9e343c1b82b67ab392ec3"
        );
    }

    // -----------------------------------------------------------------------
    // Sighash scope
    // -----------------------------------------------------------------------

    /// The flag byte follows whether an output is committed.
    #[tokio::test]
    async fn test_redeem_flags() {
        let signer = signer();
        let (_, none_flag) = unpack(&redeem(&config(None), &signer).await.expect("redeem"));
        assert_eq!(none_flag, 0xc2);
        let committed = config(Some(p2pk_commitment(9000)));
        let (_, single_flag) = unpack(&redeem(&committed, &signer).await.expect("redeem"));
        assert_eq!(single_flag, 0xc3);
    }

    /// Committing to an output changes the signature, and altering that
    /// output invalidates it.
    #[tokio::test]
    async fn test_redeem_commitment_binds_output() {
        let signer = signer();
        let open = config(None);
        let bound = config(Some(p2pk_commitment(9000)));

        let open_sig = redeem(&open, &signer).await.expect("redeem");
        let bound_sig = redeem(&bound, &signer).await.expect("redeem");
        assert_ne!(open_sig, bound_sig);
        assert!(verifies(&open_sig, &open));
        assert!(verifies(&bound_sig, &bound));

        let altered = config(Some(p2pk_commitment(9001)));
        assert!(!verifies(&bound_sig, &altered));
    }

    /// Without a commitment the signature holds for any outputs.
    #[tokio::test]
    async fn test_redeem_uncommitted_ignores_outputs() {
        let open = config(None);
        let unlocking = redeem(&open, &signer()).await.expect("redeem");
        let (signature, flag) = unpack(&unlocking);
        let outpoint = OutPoint::from_txid_hex(TXID, 2).expect("txid");
        let with_output = SigningContext::new(outpoint, Some(p2pk_commitment(5)));
        let digest = with_output.signature_hash(
            open.locking_script.to_bytes(),
            open.satoshis,
            flag as u32,
        );
        assert!(PublicKey::from_hex(PUB)
            .expect("valid key")
            .verify(&digest, &signature));
    }

    /// The input slot does not enter the preimage.
    #[tokio::test]
    async fn test_redeem_input_index_independent() {
        let signer = signer();
        let mut other_slot = config(Some(p2pk_commitment(9000)));
        other_slot.input_index = 3;
        assert_eq!(
            redeem(&config(Some(p2pk_commitment(9000))), &signer)
                .await
                .expect("redeem"),
            redeem(&other_slot, &signer).await.expect("redeem")
        );
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    struct GarbageSigner;

    impl SigningCapability for GarbageSigner {
        async fn sign(&self, _data: &[u8], _selection: &KeySelection) -> Result<Vec<u8>, PushDropError> {
            Ok(vec![0x30, 0x01, 0x02])
        }
    }

    struct FailingSigner;

    impl SigningCapability for FailingSigner {
        async fn sign(&self, _data: &[u8], _selection: &KeySelection) -> Result<Vec<u8>, PushDropError> {
            Err(PushDropError::SigningFailure("keyring locked".to_string()))
        }
    }

    #[tokio::test]
    async fn test_redeem_rejects_malformed_signature() {
        let err = redeem(&config(None), &GarbageSigner).await.unwrap_err();
        assert!(matches!(err, PushDropError::SigningFailure(_)));
    }

    /// Signer failures propagate unchanged.
    #[tokio::test]
    async fn test_redeem_propagates_signer_failure() {
        let err = redeem(&config(None), &FailingSigner).await.unwrap_err();
        match err {
            PushDropError::SigningFailure(msg) => assert_eq!(msg, "keyring locked"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_redeem_invalid_txid() {
        let mut bad = config(None);
        bad.prev_txid = "abcd".to_string();
        let err = redeem(&bad, &signer()).await.unwrap_err();
        assert!(matches!(err, PushDropError::InvalidTxid(_)));
    }
}
