//! Opcode constants used by PushDrop scripts.

/// Push an empty byte string.
pub const OP_0: u8 = 0x00;
/// Alias of [`OP_0`].
pub const OP_FALSE: u8 = 0x00;
/// Push the next byte (1 byte of data).
pub const OP_DATA_1: u8 = 0x01;
/// Push the next 75 bytes, the largest direct push.
pub const OP_DATA_75: u8 = 0x4b;
/// The next byte holds the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (little-endian) hold the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (little-endian) hold the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1, encoded as the byte `0x81`.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1.
pub const OP_1: u8 = 0x51;
/// Alias of [`OP_1`].
pub const OP_TRUE: u8 = 0x51;
/// Push the number 16.
pub const OP_16: u8 = 0x60;
/// Mark the output unspendable.
pub const OP_RETURN: u8 = 0x6a;
/// Remove the top two stack items.
pub const OP_2DROP: u8 = 0x6d;
/// Remove the top stack item.
pub const OP_DROP: u8 = 0x75;
/// Check a signature against a public key.
pub const OP_CHECKSIG: u8 = 0xac;

/// Small-integer opcodes encode their value as `opcode - SMALL_INT_BASE`.
pub const SMALL_INT_BASE: u8 = 0x50;

/// Check whether an opcode pushes data onto the stack.
///
/// Covers OP_0, direct pushes, the PUSHDATA family, OP_1NEGATE and
/// OP_1 through OP_16.
pub fn is_push(op: u8) -> bool {
    op <= OP_16 && op != 0x50
}

/// Check whether an opcode is one of the two drop opcodes.
pub fn is_drop(op: u8) -> bool {
    op == OP_DROP || op == OP_2DROP
}

/// Name an opcode for error messages.
///
/// Only opcodes that appear in PushDrop scripts have names; everything else
/// renders as `OP_UNKNOWN<n>`.
pub(crate) fn opcode_name(op: u8) -> String {
    match op {
        OP_0 => "OP_0".to_string(),
        OP_PUSHDATA1 => "OP_PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "OP_PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "OP_PUSHDATA4".to_string(),
        OP_1NEGATE => "OP_1NEGATE".to_string(),
        OP_1..=OP_16 => format!("OP_{}", op - SMALL_INT_BASE),
        OP_RETURN => "OP_RETURN".to_string(),
        OP_2DROP => "OP_2DROP".to_string(),
        OP_DROP => "OP_DROP".to_string(),
        0x76 => "OP_DUP".to_string(),
        0x87 => "OP_EQUAL".to_string(),
        0x88 => "OP_EQUALVERIFY".to_string(),
        0xa9 => "OP_HASH160".to_string(),
        OP_CHECKSIG => "OP_CHECKSIG".to_string(),
        _ => format!("OP_UNKNOWN{op}"),
    }
}
