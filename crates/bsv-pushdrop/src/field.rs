//! Token fields and the formats decoded fields are returned in.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::PushDropError;

/// One data field of a PushDrop token.
///
/// Text is normalized to its UTF-8 bytes before anything is encoded or
/// signed, so `Field::Text("hi")` and `Field::Bytes(b"hi".to_vec())` produce
/// identical scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
}

impl Field {
    /// The bytes this field contributes to the script and the signed message.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Field::Bytes(bytes) => bytes,
            Field::Text(text) => text.as_bytes(),
        }
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Self {
        Field::Text(text.to_string())
    }
}

impl From<String> for Field {
    fn from(text: String) -> Self {
        Field::Text(text)
    }
}

impl From<Vec<u8>> for Field {
    fn from(bytes: Vec<u8>) -> Self {
        Field::Bytes(bytes)
    }
}

impl From<&[u8]> for Field {
    fn from(bytes: &[u8]) -> Self {
        Field::Bytes(bytes.to_vec())
    }
}

/// Concatenate field bytes in order, with no delimiters or lengths.
pub fn concat_fields(fields: &[Field]) -> Vec<u8> {
    fields.iter().flat_map(|f| f.as_bytes().iter().copied()).collect()
}

/// Output format for decoded fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    /// Lowercase hex string.
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
    /// UTF-8 text; invalid sequences become U+FFFD.
    Utf8,
    /// The raw bytes.
    Buffer,
}

impl FieldFormat {
    /// Convert field bytes into this format.
    pub fn format(&self, bytes: Vec<u8>) -> FieldValue {
        match self {
            FieldFormat::Hex => FieldValue::Text(hex::encode(bytes)),
            FieldFormat::Base64 => FieldValue::Text(BASE64.encode(bytes)),
            FieldFormat::Utf8 => FieldValue::Text(String::from_utf8_lossy(&bytes).into_owned()),
            FieldFormat::Buffer => FieldValue::Bytes(bytes),
        }
    }
}

impl FromStr for FieldFormat {
    type Err = PushDropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(FieldFormat::Hex),
            "base64" => Ok(FieldFormat::Base64),
            "utf8" => Ok(FieldFormat::Utf8),
            "buffer" => Ok(FieldFormat::Buffer),
            other => Err(PushDropError::InvalidFieldFormat(format!(
                "{other:?} is not one of hex, base64, utf8, buffer"
            ))),
        }
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldFormat::Hex => "hex",
            FieldFormat::Base64 => "base64",
            FieldFormat::Utf8 => "utf8",
            FieldFormat::Buffer => "buffer",
        };
        write!(f, "{s}")
    }
}

/// A decoded field in the requested [`FieldFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Hex, base64 or UTF-8 text.
    Text(String),
    /// Raw bytes, for [`FieldFormat::Buffer`].
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// The text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Bytes(_) => None,
        }
    }

    /// The bytes, if this is a raw value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Bytes(bytes) => Some(bytes),
        }
    }

    /// Recover the original field bytes, given the format the value is in.
    ///
    /// Lossy UTF-8 values only round-trip when the field was valid UTF-8.
    pub fn to_raw(&self, format: FieldFormat) -> Result<Vec<u8>, PushDropError> {
        match (self, format) {
            (FieldValue::Bytes(bytes), FieldFormat::Buffer) => Ok(bytes.clone()),
            (FieldValue::Text(text), FieldFormat::Hex) => hex::decode(text)
                .map_err(|e| PushDropError::InvalidFieldFormat(e.to_string())),
            (FieldValue::Text(text), FieldFormat::Base64) => BASE64
                .decode(text)
                .map_err(|e| PushDropError::InvalidFieldFormat(e.to_string())),
            (FieldValue::Text(text), FieldFormat::Utf8) => Ok(text.as_bytes().to_vec()),
            (_, format) => Err(PushDropError::InvalidFieldFormat(format!(
                "value does not match format {format}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Text and bytes with the same content are interchangeable.
    #[test]
    fn test_text_normalizes_to_utf8() {
        let text = Field::from("hello world");
        let bytes = Field::from(b"hello world".to_vec());
        assert_eq!(text.as_bytes(), bytes.as_bytes());
        assert_ne!(text, bytes);
    }

    /// Concatenation has no separators.
    #[test]
    fn test_concat_fields() {
        let fields = vec![Field::from("hello"), Field::from(&[0x00u8, 0x01][..]), Field::from("")];
        assert_eq!(concat_fields(&fields), b"hello\x00\x01".to_vec());
        assert!(concat_fields(&[]).is_empty());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("hex".parse::<FieldFormat>().expect("format"), FieldFormat::Hex);
        assert_eq!("base64".parse::<FieldFormat>().expect("format"), FieldFormat::Base64);
        assert_eq!("utf8".parse::<FieldFormat>().expect("format"), FieldFormat::Utf8);
        assert_eq!("buffer".parse::<FieldFormat>().expect("format"), FieldFormat::Buffer);
    }

    /// Anything outside the four names is InvalidFieldFormat.
    #[test]
    fn test_format_from_str_rejects_unknown() {
        for bad in ["", "HEX", "binary", "utf-8"] {
            assert!(matches!(
                bad.parse::<FieldFormat>(),
                Err(PushDropError::InvalidFieldFormat(_))
            ));
        }
    }

    /// Each format renders the same bytes as expected.
    #[test]
    fn test_format_values() {
        let bytes = b"hi!".to_vec();
        assert_eq!(FieldFormat::Hex.format(bytes.clone()), FieldValue::Text("686921".into()));
        assert_eq!(FieldFormat::Base64.format(bytes.clone()), FieldValue::Text("aGkh".into()));
        assert_eq!(FieldFormat::Utf8.format(bytes.clone()), FieldValue::Text("hi!".into()));
        assert_eq!(FieldFormat::Buffer.format(bytes.clone()), FieldValue::Bytes(bytes));
    }

    /// Invalid UTF-8 is replaced rather than rejected.
    #[test]
    fn test_utf8_is_lossy() {
        let value = FieldFormat::Utf8.format(vec![0x66, 0xff]);
        assert_eq!(value.as_str(), Some("f\u{fffd}"));
    }

    /// to_raw inverts format for hex, base64 and buffer.
    #[test]
    fn test_to_raw_inverts_format() {
        let bytes = vec![0x00, 0x81, 0xff, 0x10];
        for format in [FieldFormat::Hex, FieldFormat::Base64, FieldFormat::Buffer] {
            let value = format.format(bytes.clone());
            assert_eq!(value.to_raw(format).expect("raw"), bytes);
        }
        assert!(FieldValue::Bytes(bytes).to_raw(FieldFormat::Hex).is_err());
    }

    #[test]
    fn test_format_serde_names() {
        let json = serde_json::to_string(&FieldFormat::Base64).expect("serialize");
        assert_eq!(json, "\"base64\"");
        let back: FieldFormat = serde_json::from_str("\"utf8\"").expect("deserialize");
        assert_eq!(back, FieldFormat::Utf8);
    }
}
