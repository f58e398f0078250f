//! Little-endian serialization helpers for sighash preimages.

/// A Bitcoin protocol variable-length integer.
///
/// Encodes in 1, 3, 5 or 9 bytes depending on magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Encode the VarInt into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        if v < 0xfd {
            vec![v as u8]
        } else if v <= 0xffff {
            let mut buf = vec![0xfd];
            buf.extend_from_slice(&(v as u16).to_le_bytes());
            buf
        } else if v <= 0xffff_ffff {
            let mut buf = vec![0xfe];
            buf.extend_from_slice(&(v as u32).to_le_bytes());
            buf
        } else {
            let mut buf = vec![0xff];
            buf.extend_from_slice(&v.to_le_bytes());
            buf
        }
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

/// An append-only buffer for Bitcoin wire data.
#[derive(Debug, Default)]
pub struct BsvWriter {
    buf: Vec<u8>,
}

impl BsvWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        BsvWriter { buf: Vec::new() }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Append a little-endian u32.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt.
    pub fn write_varint(&mut self, varint: VarInt) {
        self.buf.extend_from_slice(&varint.to_bytes());
    }

    /// Append a VarInt length prefix followed by the bytes.
    pub fn write_var_bytes(&mut self, data: &[u8]) {
        self.write_varint(VarInt::from(data.len()));
        self.write_bytes(data);
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each size class boundary picks the right prefix.
    #[test]
    fn test_varint_boundaries() {
        assert_eq!(VarInt(0).to_bytes(), vec![0x00]);
        assert_eq!(VarInt(0xfc).to_bytes(), vec![0xfc]);
        assert_eq!(VarInt(0xfd).to_bytes(), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(VarInt(0xffff).to_bytes(), vec![0xfd, 0xff, 0xff]);
        assert_eq!(VarInt(0x10000).to_bytes(), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(VarInt(0xffff_ffff).to_bytes(), vec![0xfe, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(VarInt(0x1_0000_0000).to_bytes().len(), 9);
    }

    #[test]
    fn test_writer_little_endian() {
        let mut w = BsvWriter::new();
        w.write_u32_le(1);
        w.write_u64_le(133700);
        w.write_var_bytes(&[0x00, 0x6a]);
        assert_eq!(hex::encode(w.into_bytes()), "01000000440a02000000000002006a");
    }
}
