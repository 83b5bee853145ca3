//! Error types for stream decoding
//!
//! End of stream is not an error. Scanners report it through
//! [`Scanned::eof`](crate::Scanned) and decoders through `Ok(None)`.

use std::fmt;
use std::io;
use thiserror::Error;

/// Errors raised while framing records out of a byte stream
#[derive(Error, Debug)]
pub enum StreamError {
    /// The initial offset could not be skipped
    #[error("failed to discard offset {offset}: {source}")]
    OffsetDiscard {
        /// The requested initial offset
        offset: u64,
        /// The short read or I/O failure hit while discarding
        #[source]
        source: io::Error,
    },

    /// The source failed for a reason other than clean exhaustion
    #[error("failed to read from stream: {0}")]
    Read(#[source] io::Error),

    /// A single token outgrew the scanning buffer
    #[error("token exceeds maximum size of {limit} bytes")]
    TokenTooLong {
        /// The configured buffer limit in bytes
        limit: usize,
    },

    /// The per-record transformation rejected a token
    #[error("record transform failed: {0}")]
    Transform(String),
}

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// A failed decode call together with the records it had already appended
///
/// Offsets reported by the decoder include the bytes behind `partial`, so a
/// caller that drops it and resumes from [`BatchDecoder::offset`] skips those
/// records.
///
/// [`BatchDecoder::offset`]: crate::BatchDecoder::offset
pub struct DecodeError<B> {
    /// Records appended during the failing call
    pub partial: B,
    /// The underlying failure
    pub source: StreamError,
}

impl<B> DecodeError<B> {
    /// Pair a failure with the batch built so far
    pub fn new(partial: B, source: StreamError) -> Self {
        Self { partial, source }
    }

    /// Drop the partial batch and keep the failure
    pub fn into_source(self) -> StreamError {
        self.source
    }
}

impl<B> fmt::Debug for DecodeError<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeError")
            .field("partial", &format!("<{}>", std::any::type_name::<B>()))
            .field("source", &self.source)
            .finish()
    }
}

impl<B> fmt::Display for DecodeError<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode failed: {}", self.source)
    }
}

impl<B> std::error::Error for DecodeError<B> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<B> From<DecodeError<B>> for StreamError {
    fn from(err: DecodeError<B>) -> Self {
        err.source
    }
}
