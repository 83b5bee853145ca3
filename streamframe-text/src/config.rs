//! Text codec configuration

use crate::charset::Charset;
use crate::codec::TextLogCodec;
use crate::error::{CodecError, Result};
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use streamframe_core::{Separator, DEFAULT_MAX_TOKEN_SIZE};

/// Configuration for [`TextLogCodec`]
///
/// Every field has a default, so a partial TOML table only overrides the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextCodecConfig {
    /// Character set label of incoming records (`nop` disables decoding)
    pub encoding: String,
    /// Reject records that are not valid in `encoding`
    pub strict_encoding: bool,
    /// Inserted between records when marshaling
    pub marshaling_separator: String,
    /// Regular expression splitting records when unmarshaling
    ///
    /// An empty pattern keeps the whole input as one record.
    pub unmarshaling_separator: String,
    /// Largest record accepted, separator excluded
    pub max_record_size: usize,
}

impl Default for TextCodecConfig {
    fn default() -> Self {
        Self {
            encoding: "utf8".to_string(),
            strict_encoding: false,
            marshaling_separator: "\n".to_string(),
            unmarshaling_separator: r"\r?\n".to_string(),
            max_record_size: DEFAULT_MAX_TOKEN_SIZE,
        }
    }
}

impl TextCodecConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check the configuration without building a codec
    pub fn validate(&self) -> Result<()> {
        self.charset()?;
        self.separator()?;
        if self.max_record_size == 0 {
            return Err(CodecError::Config(
                "max_record_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the codec described by this configuration
    pub fn build(&self) -> Result<TextLogCodec> {
        self.validate()?;
        Ok(TextLogCodec::new(
            self.charset()?,
            self.marshaling_separator.clone(),
            self.separator()?,
        )
        .with_max_record_size(self.max_record_size))
    }

    fn charset(&self) -> Result<Charset> {
        Ok(Charset::for_label(&self.encoding)?.strict(self.strict_encoding))
    }

    /// Resolve the unmarshaling separator into a tokenization policy
    pub fn separator(&self) -> Result<Separator> {
        match self.unmarshaling_separator.as_str() {
            "" => Ok(Separator::Remainder),
            "\n" => Ok(Separator::Newline),
            pattern => Regex::new(pattern)
                .map(Separator::Pattern)
                .map_err(|source| CodecError::InvalidSeparator {
                    pattern: pattern.to_string(),
                    source,
                }),
        }
    }
}
