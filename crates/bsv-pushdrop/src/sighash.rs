//! FORKID signature hashing over a one-input signing context.
//!
//! Redeeming a PushDrop output authorizes a single input, optionally bound
//! to a single output. The context here holds exactly that much of the
//! spending transaction, which is all the preimage needs under the flags
//! PushDrop uses.
//!
//! See <https://github.com/bitcoin-sv/bitcoin-sv/blob/master/doc/abc/replay-protected-sighash.md#digest-algorithm>

use serde::{Deserialize, Serialize};

use crate::hash::sha256d;
use crate::script::Script;
use crate::util::BsvWriter;
use crate::PushDropError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all outputs.
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign no outputs.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign only the output at the same index as the input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Sign only this input; other inputs may be added freely.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Replay-protection flag required on BSV signatures.
pub const SIGHASH_FORKID: u32 = 0x40;

/// Mask selecting the base type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Flags for a redemption bound to one output.
pub const SIGHASH_SINGLE_ANYONECANPAY_FORKID: u32 =
    SIGHASH_FORKID | SIGHASH_SINGLE | SIGHASH_ANYONECANPAY;

/// Flags for a redemption that ignores outputs.
pub const SIGHASH_NONE_ANYONECANPAY_FORKID: u32 =
    SIGHASH_FORKID | SIGHASH_NONE | SIGHASH_ANYONECANPAY;

/// Sequence number of a final input.
pub const DEFAULT_SEQUENCE: u32 = 0xffff_ffff;

// -----------------------------------------------------------------------
// Signing context
// -----------------------------------------------------------------------

/// A reference to a transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutPoint {
    /// Transaction id in internal byte order (reversed from display hex).
    pub txid: [u8; 32],
    /// Output index.
    pub vout: u32,
}

impl OutPoint {
    /// Build an outpoint from a display-order txid hex string.
    ///
    /// # Returns
    /// The outpoint, or `InvalidTxid` unless the text is 32 bytes of hex.
    pub fn from_txid_hex(txid: &str, vout: u32) -> Result<Self, PushDropError> {
        let bytes = hex::decode(txid)
            .map_err(|e| PushDropError::InvalidTxid(format!("{e} in {txid:?}")))?;
        let mut txid_bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            PushDropError::InvalidTxid(format!("expected 32 bytes, got {}", b.len()))
        })?;
        txid_bytes.reverse();
        Ok(OutPoint { txid: txid_bytes, vout })
    }

    fn write_to(&self, writer: &mut BsvWriter) {
        writer.write_bytes(&self.txid);
        writer.write_u32_le(self.vout);
    }
}

/// An output a redemption signature commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCommitment {
    /// Locking script of the committed output.
    pub script: Script,
    /// Value of the committed output in satoshis.
    pub satoshis: u64,
}

impl OutputCommitment {
    /// Serialize as a transaction output: value, then length-prefixed script.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BsvWriter::new();
        writer.write_u64_le(self.satoshis);
        writer.write_var_bytes(self.script.to_bytes());
        writer.into_bytes()
    }
}

/// The parts of a spending transaction a one-input signature can see.
#[derive(Debug, Clone)]
pub struct SigningContext {
    /// Transaction version.
    pub version: u32,
    /// The input being authorized.
    pub outpoint: OutPoint,
    /// Sequence number of the input.
    pub sequence: u32,
    /// The output sharing the input's index, if any.
    pub output: Option<OutputCommitment>,
    /// Transaction lock time.
    pub lock_time: u32,
}

impl SigningContext {
    /// A version 1 context with a final input and zero lock time.
    pub fn new(outpoint: OutPoint, output: Option<OutputCommitment>) -> Self {
        SigningContext {
            version: 1,
            outpoint,
            sequence: DEFAULT_SEQUENCE,
            output,
            lock_time: 0,
        }
    }

    /// Compute the preimage for the input under `sighash_type`.
    ///
    /// The preimage consists of:
    /// 1. nVersion (4 bytes LE)
    /// 2. hashPrevouts (32 bytes), zero under ANYONECANPAY
    /// 3. hashSequence (32 bytes), zero under ANYONECANPAY/SINGLE/NONE
    /// 4. outpoint (32+4 bytes)
    /// 5. scriptCode (varint + script)
    /// 6. value (8 bytes LE)
    /// 7. nSequence (4 bytes LE)
    /// 8. hashOutputs (32 bytes), zero under NONE or SINGLE without an output
    /// 9. nLocktime (4 bytes LE)
    /// 10. sighashType (4 bytes LE)
    ///
    /// # Arguments
    /// * `script_code` - The locking script of the output being spent.
    /// * `satoshis`    - The value of the output being spent.
    /// * `sighash_type` - Combined sighash flags.
    pub fn preimage(&self, script_code: &[u8], satoshis: u64, sighash_type: u32) -> Vec<u8> {
        let base_type = sighash_type & SIGHASH_MASK;
        let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

        let hash_prevouts = if anyone_can_pay {
            [0u8; 32]
        } else {
            let mut writer = BsvWriter::new();
            self.outpoint.write_to(&mut writer);
            sha256d(&writer.into_bytes())
        };

        let hash_sequence =
            if anyone_can_pay || base_type == SIGHASH_SINGLE || base_type == SIGHASH_NONE {
                [0u8; 32]
            } else {
                sha256d(&self.sequence.to_le_bytes())
            };

        let hash_outputs = match (&self.output, base_type) {
            (_, SIGHASH_NONE) => [0u8; 32],
            (Some(output), _) => sha256d(&output.to_bytes()),
            (None, SIGHASH_SINGLE) => [0u8; 32],
            (None, _) => sha256d(&[]),
        };

        let mut writer = BsvWriter::new();
        writer.write_u32_le(self.version);
        writer.write_bytes(&hash_prevouts);
        writer.write_bytes(&hash_sequence);
        self.outpoint.write_to(&mut writer);
        writer.write_var_bytes(script_code);
        writer.write_u64_le(satoshis);
        writer.write_u32_le(self.sequence);
        writer.write_bytes(&hash_outputs);
        writer.write_u32_le(self.lock_time);
        writer.write_u32_le(sighash_type);
        writer.into_bytes()
    }

    /// The digest a signature over this input must sign: sha256d of the preimage.
    pub fn signature_hash(&self, script_code: &[u8], satoshis: u64, sighash_type: u32) -> [u8; 32] {
        sha256d(&self.preimage(script_code, satoshis, sighash_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "7f69c4a9d3daf04686ac6c00db1d7650c5f44dd8fbe7704d0c3c86a0350de0c9";

    fn context(output: Option<OutputCommitment>) -> SigningContext {
        SigningContext::new(OutPoint::from_txid_hex(TXID, 2).expect("txid"), output)
    }

    /// The txid is stored in internal (reversed) byte order.
    #[test]
    fn test_outpoint_byte_order() {
        let outpoint = OutPoint::from_txid_hex(TXID, 2).expect("txid");
        assert_eq!(outpoint.txid[0], 0xc9);
        assert_eq!(outpoint.txid[31], 0x7f);
        assert_eq!(outpoint.vout, 2);
    }

    #[test]
    fn test_outpoint_invalid() {
        assert!(matches!(
            OutPoint::from_txid_hex("abcd", 0),
            Err(PushDropError::InvalidTxid(_))
        ));
        assert!(matches!(
            OutPoint::from_txid_hex(&"zz".repeat(32), 0),
            Err(PushDropError::InvalidTxid(_))
        ));
    }

    /// Output serialization is value then varint-prefixed script.
    #[test]
    fn test_output_to_bytes() {
        let output = OutputCommitment {
            script: Script::from_hex("006a").expect("hex"),
            satoshis: 1,
        };
        assert_eq!(hex::encode(output.to_bytes()), "010000000000000002006a");
    }

    /// Layout of a NONE|ANYONECANPAY preimage: every commitment hash is zero.
    #[test]
    fn test_preimage_none_anyonecanpay_layout() {
        let ctx = context(None);
        let script = [0xacu8];
        let preimage = ctx.preimage(&script, 133700, SIGHASH_NONE_ANYONECANPAY_FORKID);

        let mut expected = Vec::new();
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&[0u8; 64]);
        expected.extend_from_slice(&ctx.outpoint.txid);
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&[0x01, 0xac]);
        expected.extend_from_slice(&133700u64.to_le_bytes());
        expected.extend_from_slice(&[0xff; 4]);
        expected.extend_from_slice(&[0u8; 32]);
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&0xc2u32.to_le_bytes());
        assert_eq!(preimage, expected);
    }

    /// SINGLE commits to the output; NONE ignores it.
    #[test]
    fn test_single_commits_to_output() {
        let output = OutputCommitment {
            script: Script::from_hex("006a").expect("hex"),
            satoshis: 1,
        };
        let altered = OutputCommitment {
            satoshis: 2,
            ..output.clone()
        };
        let script = [0xacu8];

        let single = context(Some(output.clone()))
            .signature_hash(&script, 10, SIGHASH_SINGLE_ANYONECANPAY_FORKID);
        let single_altered = context(Some(altered.clone()))
            .signature_hash(&script, 10, SIGHASH_SINGLE_ANYONECANPAY_FORKID);
        assert_ne!(single, single_altered);

        let none = context(Some(output)).signature_hash(&script, 10, SIGHASH_NONE_ANYONECANPAY_FORKID);
        let none_altered =
            context(Some(altered)).signature_hash(&script, 10, SIGHASH_NONE_ANYONECANPAY_FORKID);
        let none_bare = context(None).signature_hash(&script, 10, SIGHASH_NONE_ANYONECANPAY_FORKID);
        assert_eq!(none, none_altered);
        assert_eq!(none, none_bare);
    }

    /// Without ANYONECANPAY the outpoint and sequence hashes are filled in.
    #[test]
    fn test_all_fills_prevouts_and_sequence() {
        let ctx = context(None);
        let preimage = ctx.preimage(&[], 0, SIGHASH_ALL | SIGHASH_FORKID);
        assert_ne!(&preimage[4..36], &[0u8; 32]);
        assert_eq!(&preimage[36..68], &sha256d(&[0xff; 4]));
    }

    /// The spent value changes the digest.
    #[test]
    fn test_value_is_committed() {
        let ctx = context(None);
        let a = ctx.signature_hash(&[0xac], 1000, SIGHASH_NONE_ANYONECANPAY_FORKID);
        let b = ctx.signature_hash(&[0xac], 1001, SIGHASH_NONE_ANYONECANPAY_FORKID);
        assert_ne!(a, b);
    }
}
