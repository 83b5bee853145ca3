//! Character set decoding of raw records

use crate::error::{CodecError, Result};
use encoding_rs::Encoding;
use streamframe_core::{RecordTransform, StreamError};

/// Label that disables character set decoding
pub const NOP_LABEL: &str = "nop";

/// Decodes raw record bytes into text
///
/// Malformed sequences are replaced with U+FFFD unless the charset is
/// strict, in which case they fail the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: Option<&'static Encoding>,
    strict: bool,
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl Charset {
    /// UTF-8 decoding
    pub fn utf8() -> Self {
        Self {
            encoding: Some(encoding_rs::UTF_8),
            strict: false,
        }
    }

    /// Pass bytes through as lossy UTF-8 without any decoder
    pub fn nop() -> Self {
        Self {
            encoding: None,
            strict: false,
        }
    }

    /// Look up a charset by label (`utf8`, `utf-16le`, `shift_jis`, `nop`, ...)
    pub fn for_label(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case(NOP_LABEL) {
            return Ok(Self::nop());
        }
        Encoding::for_label(trimmed.as_bytes())
            .map(|encoding| Self {
                encoding: Some(encoding),
                strict: false,
            })
            .ok_or_else(|| CodecError::UnsupportedEncoding(label.to_string()))
    }

    /// Reject malformed input instead of replacing it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Canonical name of the charset
    pub fn name(&self) -> &'static str {
        self.encoding.map_or(NOP_LABEL, Encoding::name)
    }

    /// Decode one record
    pub fn decode(&self, raw: &[u8]) -> streamframe_core::Result<String> {
        let Some(encoding) = self.encoding else {
            return Ok(String::from_utf8_lossy(raw).into_owned());
        };

        if self.strict {
            return encoding
                .decode_without_bom_handling_and_without_replacement(raw)
                .map(|text| text.into_owned())
                .ok_or_else(|| {
                    StreamError::Transform(format!(
                        "record of {} bytes is not valid {}",
                        raw.len(),
                        encoding.name()
                    ))
                });
        }

        let (text, _had_errors) = encoding.decode_without_bom_handling(raw);
        Ok(text.into_owned())
    }
}

impl RecordTransform for Charset {
    type Output = String;

    fn transform(&mut self, raw: &[u8]) -> streamframe_core::Result<String> {
        self.decode(raw)
    }
}
