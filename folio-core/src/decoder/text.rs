//! Plain text decoding with a single legacy-encoding fallback

use crate::error::DecodeError;
use encoding_rs::{Encoding, GBK, UTF_8};

const BOM: char = '\u{feff}';

/// Lines decoded from a plain-text book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// Lines in source order, split on `\n`
    pub lines: Vec<String>,

    /// Name of the encoding that succeeded
    pub encoding: &'static str,
}

/// Decoder for plain-text books
///
/// Decoding is attempted twice: strict UTF-8 first, then the configured
/// legacy encoding. Neither attempt substitutes replacement characters, so
/// a failed attempt is detected rather than silently producing mojibake.
#[derive(Debug, Clone, Copy)]
pub struct TextDecoder {
    fallback: &'static Encoding,
}

impl TextDecoder {
    /// Create a decoder that falls back to GBK
    pub fn new() -> Self {
        Self { fallback: GBK }
    }

    /// Create a decoder with the fallback named by a WHATWG encoding label
    pub fn with_fallback_label(label: &str) -> Result<Self, DecodeError> {
        let fallback = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| DecodeError::UnknownEncoding(label.to_string()))?;
        Ok(Self { fallback })
    }

    /// Name of the fallback encoding
    pub fn fallback_name(&self) -> &'static str {
        self.fallback.name()
    }

    /// Decode bytes into lines
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedText, DecodeError> {
        let strict = UTF_8.decode_without_bom_handling_and_without_replacement(bytes);
        let (text, encoding) = match strict {
            Some(text) => (text, UTF_8),
            None => {
                tracing::debug!(
                    fallback = self.fallback.name(),
                    "Text is not valid UTF-8, retrying with fallback encoding"
                );
                let text = self
                    .fallback
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .ok_or(DecodeError::Undecodable {
                        fallback: self.fallback.name(),
                    })?;
                (text, self.fallback)
            }
        };

        Ok(DecodedText {
            lines: split_lines(&text),
            encoding: encoding.name(),
        })
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text on line feeds, stripping a byte-order mark from the first line only
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    text.split('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_lines() {
        let decoded = TextDecoder::new().decode("one\ntwo\nthree".as_bytes()).unwrap();
        assert_eq!(decoded.lines, vec!["one", "two", "three"]);
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn test_trailing_newline_keeps_final_empty_line() {
        let decoded = TextDecoder::new().decode(b"a\nb\n").unwrap();
        assert_eq!(decoded.lines, vec!["a", "b", ""]);
    }

    #[test]
    fn test_empty_input_is_one_empty_line() {
        let decoded = TextDecoder::new().decode(b"").unwrap();
        assert_eq!(decoded.lines, vec![""]);
    }

    #[test]
    fn test_carriage_returns_are_content() {
        let decoded = TextDecoder::new().decode(b"a\r\nb").unwrap();
        assert_eq!(decoded.lines, vec!["a\r", "b"]);
    }

    #[test]
    fn test_bom_stripped_from_first_line_only() {
        let text = "\u{feff}first\n\u{feff}second";
        let decoded = TextDecoder::new().decode(text.as_bytes()).unwrap();
        assert_eq!(decoded.lines, vec!["first", "\u{feff}second"]);
    }

    #[test]
    fn test_gbk_fallback() {
        // "中文" encoded as GBK is not valid UTF-8
        let bytes = [0xD6, 0xD0, 0xCE, 0xC4, b'\n', b'x'];
        let decoded = TextDecoder::new().decode(&bytes).unwrap();
        assert_eq!(decoded.lines, vec!["中文", "x"]);
        assert_eq!(decoded.encoding, "GBK");
    }

    #[test]
    fn test_configured_fallback() {
        let decoder = TextDecoder::with_fallback_label("windows-1252").unwrap();
        let decoded = decoder.decode(&[b'c', b'a', b'f', 0xE9]).unwrap();
        assert_eq!(decoded.lines, vec!["café"]);
        assert_eq!(decoded.encoding, "windows-1252");
    }

    #[test]
    fn test_undecodable_under_both_attempts() {
        let err = TextDecoder::new().decode(&[0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, DecodeError::Undecodable { fallback: "GBK" }));
    }

    #[test]
    fn test_unknown_label() {
        let err = TextDecoder::with_fallback_label("klingon").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownEncoding(_)));
    }
}
