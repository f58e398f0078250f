//! Script chunk parsing and minimal push encoding.
//!
//! A chunk is either a bare opcode or a data push carrying its bytes.
//! PushDrop scripts are built as a sequence of chunks and serialized once,
//! and decoded back into the same representation, so both directions share
//! the push rules defined here.

use crate::opcodes::*;
use crate::PushDropError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub op: u8,
    /// The pushed bytes for OP_DATA_1..OP_DATA_75 and OP_PUSHDATA1/2/4.
    ///
    /// `None` for every other opcode, including OP_0, OP_1NEGATE and the
    /// small-integer opcodes, whose value is implied by the opcode itself.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Create a chunk holding a bare opcode.
    pub fn opcode(op: u8) -> Self {
        ScriptChunk { op, data: None }
    }

    /// Build the canonical push for a byte string.
    ///
    /// The opcode is chosen by the first matching rule:
    /// 1. empty data uses OP_0;
    /// 2. a single byte 1..=16 uses OP_1..OP_16;
    /// 3. the single byte `0x81` uses OP_1NEGATE;
    /// 4. up to 75 bytes use a direct length-prefixed push;
    /// 5. up to 255 bytes use OP_PUSHDATA1;
    /// 6. up to 65535 bytes use OP_PUSHDATA2;
    /// 7. anything longer uses OP_PUSHDATA4.
    ///
    /// # Arguments
    /// * `data` - The bytes to push.
    ///
    /// # Returns
    /// The push chunk, or `DataTooBig` if the data exceeds `u32::MAX` bytes.
    pub fn minimal_push(data: &[u8]) -> Result<Self, PushDropError> {
        let chunk = match data {
            [] => ScriptChunk::opcode(OP_0),
            [v @ 1..=16] => ScriptChunk::opcode(SMALL_INT_BASE + v),
            [0x81] => ScriptChunk::opcode(OP_1NEGATE),
            _ => {
                let op = match data.len() {
                    len if len <= OP_DATA_75 as usize => len as u8,
                    len if len <= 0xff => OP_PUSHDATA1,
                    len if len <= 0xffff => OP_PUSHDATA2,
                    len if len <= 0xffff_ffff => OP_PUSHDATA4,
                    len => return Err(PushDropError::DataTooBig(len)),
                };
                ScriptChunk { op, data: Some(data.to_vec()) }
            }
        };
        Ok(chunk)
    }

    /// Check whether this chunk pushes a value onto the stack.
    pub fn is_push(&self) -> bool {
        is_push(self.op)
    }

    /// Return the bytes this chunk leaves on the stack, if it is a push.
    ///
    /// OP_0 yields an empty vector, OP_1NEGATE yields `[0x81]` and
    /// OP_1..OP_16 yield the single byte `1..=16`. This is the exact inverse
    /// of [`ScriptChunk::minimal_push`], and it also accepts non-minimal
    /// pushes.
    pub fn pushed_bytes(&self) -> Option<Vec<u8>> {
        match self.op {
            OP_0 => Some(Vec::new()),
            OP_1NEGATE => Some(vec![0x81]),
            OP_1..=OP_16 => Some(vec![self.op - SMALL_INT_BASE]),
            OP_DATA_1..=OP_PUSHDATA4 => Some(self.data.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// Append the serialized form of this chunk to `buf`.
    ///
    /// Length prefixes are derived from `data`; a PUSHDATA chunk built by
    /// hand must carry data that fits its prefix width.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.op);
        let Some(ref data) = self.data else {
            return;
        };
        match self.op {
            OP_PUSHDATA1 => buf.push(data.len() as u8),
            OP_PUSHDATA2 => buf.extend_from_slice(&(data.len() as u16).to_le_bytes()),
            OP_PUSHDATA4 => buf.extend_from_slice(&(data.len() as u32).to_le_bytes()),
            _ => {}
        }
        buf.extend_from_slice(data);
    }
}

/// Serialize a chunk sequence into raw script bytes.
pub fn encode_chunks(chunks: &[ScriptChunk]) -> Vec<u8> {
    let mut buf = Vec::new();
    for chunk in chunks {
        chunk.write_to(&mut buf);
    }
    buf
}

/// Return the hex-encoded minimal push of a byte string.
///
/// # Arguments
/// * `data` - The bytes to push.
///
/// # Returns
/// Hex of the canonical push chunk (see [`ScriptChunk::minimal_push`]).
pub fn encode_push(data: &[u8]) -> Result<String, PushDropError> {
    let chunk = ScriptChunk::minimal_push(data)?;
    Ok(hex::encode(encode_chunks(&[chunk])))
}

/// Read a little-endian length of `width` bytes following the opcode at `pos`.
fn read_length(bytes: &[u8], pos: usize, width: usize) -> Result<usize, PushDropError> {
    let raw = bytes.get(pos + 1..pos + 1 + width).ok_or_else(|| {
        PushDropError::InvalidOpcode(format!(
            "truncated push length at offset {pos}"
        ))
    })?;
    let mut le = [0u8; 4];
    le[..width].copy_from_slice(raw);
    Ok(u32::from_le_bytes(le) as usize)
}

/// Decode raw script bytes into chunks.
///
/// Accepts every push form, minimal or not. Opcodes other than pushes are
/// returned as bare chunks without interpretation.
///
/// # Arguments
/// * `bytes` - The raw script bytes.
///
/// # Returns
/// The parsed chunks, or `InvalidOpcode` if a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, PushDropError> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        let (length, header) = match op {
            OP_DATA_1..=OP_DATA_75 => (op as usize, 1),
            OP_PUSHDATA1 => (read_length(bytes, pos, 1)?, 2),
            OP_PUSHDATA2 => (read_length(bytes, pos, 2)?, 3),
            OP_PUSHDATA4 => (read_length(bytes, pos, 4)?, 5),
            _ => {
                chunks.push(ScriptChunk::opcode(op));
                pos += 1;
                continue;
            }
        };

        let start = pos + header;
        let data = bytes.get(start..start + length).ok_or_else(|| {
            PushDropError::InvalidOpcode(format!(
                "push of {length} bytes at offset {pos} runs past end of script"
            ))
        })?;
        chunks.push(ScriptChunk { op, data: Some(data.to_vec()) });
        pos = start + length;
    }

    Ok(chunks)
}
