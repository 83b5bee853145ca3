//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Input file not found or inaccessible
    InputNotFound(String),
    /// Configuration error
    ConfigError(String),
    /// Decoding stopped before the end of the stream
    DecodeFailed {
        /// Offset a caller can resume from
        offset: u64,
        /// Underlying decoder error
        message: String,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InputNotFound(path) => write!(f, "Input not found: {path}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::DecodeFailed { offset, message } => {
                write!(f, "Decoding failed at offset {offset}: {message}")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found_display() {
        let error = CliError::InputNotFound("app.log".to_string());
        assert_eq!(error.to_string(), "Input not found: app.log");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_decode_failed_display() {
        let error = CliError::DecodeFailed {
            offset: 42,
            message: "token exceeds 16 bytes".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Decoding failed at offset 42: token exceeds 16 bytes"
        );
    }

    #[test]
    fn test_cli_result_type_alias() {
        let failure: CliResult<()> = Err(CliError::ConfigError("x".to_string()).into());
        let err = failure.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
