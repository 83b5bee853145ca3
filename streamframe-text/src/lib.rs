//! Text log codec
//!
//! Splits a byte stream into log records on a configurable separator
//! pattern, decodes each record from its character set, and joins records
//! back together with a marshaling separator.

#![warn(missing_docs)]

pub mod charset;
pub mod codec;
pub mod config;
pub mod error;
pub mod lines;
pub mod logs;

// Re-export key types
pub use charset::Charset;
pub use codec::{TextLogCodec, TextLogsDecoder};
pub use config::TextCodecConfig;
pub use error::{CodecError, Result};
pub use lines::LineLogsDecoder;
pub use logs::{LogBatch, LogRecord};

// Re-export from core for convenience
pub use streamframe_core::{BatchDecoder, DecodeError, DecoderOption, DecoderOptions};
