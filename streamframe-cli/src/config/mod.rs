//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use streamframe_core::DecoderOptions;
use streamframe_text::TextCodecConfig;

/// CLI configuration structure
///
/// Both tables are optional; missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Flush thresholds and starting offset
    #[serde(default)]
    pub decoder: DecoderOptions,

    /// Text codec settings
    #[serde(default)]
    pub text: TextCodecConfig,
}

impl CliConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check every setting that could fail when decoding starts
    pub fn validate(&self) -> Result<()> {
        self.text
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(())
    }

    /// Commented template with every key at its default value
    pub fn template() -> String {
        let decoder = DecoderOptions::default();
        let text = TextCodecConfig::default();
        format!(
            r#"# streamframe configuration

[decoder]
# Flush a batch once this many record bytes were read (0 disables)
flush_bytes = {flush_bytes}
# Flush a batch once this many records were read (0 disables)
flush_items = {flush_items}
# Bytes to skip before the first record, e.g. a saved checkpoint
offset = {offset}

[text]
# Character set of the input; any WHATWG label, or "nop" for raw bytes
encoding = "{encoding}"
# Fail on malformed input instead of substituting U+FFFD
strict_encoding = {strict}
# Inserted between records when marshaling
marshaling_separator = "\n"
# Regular expression between records; "" reads the whole input as one record
unmarshaling_separator = '{unmarshaling}'
# Largest record in bytes, separator excluded
max_record_size = {max_record_size}
"#,
            flush_bytes = decoder.flush_bytes,
            flush_items = decoder.flush_items,
            offset = decoder.offset,
            encoding = text.encoding,
            strict = text.strict_encoding,
            unmarshaling = text.unmarshaling_separator,
            max_record_size = text.max_record_size,
        )
    }
}
