//! Batched, resumable record framing over byte streams
//!
//! This crate turns an unbounded byte stream into batches of records. It
//! provides a newline [`LineScanner`], a pattern driven [`DelimitedDecoder`],
//! the [`BatchTracker`] that decides when a batch is full, and the byte offset
//! bookkeeping needed to resume a stream after a failure.
//!
//! Offsets are handed back to the caller. Persisting them is left to
//! whatever checkpoint store the caller uses.

#![warn(missing_docs)]

pub mod adapter;
pub mod batch;
pub mod delimited;
pub mod error;
pub mod options;
pub mod record;
pub mod scanner;
pub mod token_stream;
pub mod tokenizer;

// Re-export key types
pub use adapter::{BatchDecoder, Batches, DecoderAdapter};
pub use batch::BatchTracker;
pub use delimited::DelimitedDecoder;
pub use error::{DecodeError, Result, StreamError};
pub use options::{DecoderOption, DecoderOptions, DEFAULT_FLUSH_BYTES, DEFAULT_FLUSH_ITEMS};
pub use record::{join_records, RecordBatch, RecordTransform};
pub use scanner::{LineScanner, Scanned};
pub use token_stream::{TokenStream, DEFAULT_MAX_TOKEN_SIZE};
pub use tokenizer::{
    NewlineTokenizer, PatternTokenizer, RemainderTokenizer, Separator, Token, Tokenizer,
};
