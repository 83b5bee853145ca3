//! Codec error types

use streamframe_core::StreamError;
use thiserror::Error;

/// Errors raised while configuring or running the text codec
#[derive(Error, Debug)]
pub enum CodecError {
    /// The configured character set is not known
    #[error("unsupported encoding '{0}'")]
    UnsupportedEncoding(String),

    /// The unmarshaling separator is not a valid regular expression
    #[error("invalid unmarshaling separator {pattern:?}: {source}")]
    InvalidSeparator {
        /// The rejected pattern
        pattern: String,
        /// The regex compilation failure
        #[source]
        source: regex::Error,
    },

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The underlying stream decoder failed
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
