//! Batch decoding over a pluggable tokenizer

use crate::adapter::BatchDecoder;
use crate::batch::BatchTracker;
use crate::error::{DecodeError, Result};
use crate::options::DecoderOptions;
use crate::record::{RecordBatch, RecordTransform};
use crate::token_stream::TokenStream;
use crate::tokenizer::Tokenizer;
use std::io::Read;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Decodes tokenized records into batches bounded by the flush thresholds
///
/// Each non-empty token is transformed and appended. The byte threshold
/// counts token bytes before transformation, separators excluded. Empty
/// tokens still advance the offset but produce no record.
pub struct DelimitedDecoder<R, T, X, B> {
    tokens: TokenStream<R, T>,
    transform: X,
    tracker: BatchTracker,
    _batch: PhantomData<fn() -> B>,
}

impl<R, T, X, B> DelimitedDecoder<R, T, X, B>
where
    R: Read,
    T: Tokenizer,
    X: RecordTransform,
    B: RecordBatch<Record = X::Output>,
{
    /// Create a decoder, skipping `options.offset` bytes of `reader` first
    pub fn new(reader: R, tokenizer: T, transform: X, options: DecoderOptions) -> Result<Self> {
        let tokens = TokenStream::new(reader, tokenizer, options.offset)?;
        debug!(
            offset = options.offset,
            flush_bytes = options.flush_bytes,
            flush_items = options.flush_items,
            "delimited decoder ready"
        );
        Ok(Self {
            tokens,
            transform,
            tracker: BatchTracker::new(options),
            _batch: PhantomData,
        })
    }

    /// Set the largest token accepted, separator excluded
    pub fn with_max_token_size(mut self, limit: usize) -> Self {
        self.tokens = self.tokens.with_max_token_size(limit);
        self
    }

    /// Decode the next batch, or return `None` once the stream is exhausted
    ///
    /// Returns as soon as a threshold is reached; remaining tokens wait for
    /// the next call. A call that appends nothing before the stream ends
    /// reports end of stream.
    pub fn decode(&mut self) -> std::result::Result<Option<B>, DecodeError<B>> {
        let mut batch = B::default();

        loop {
            let token = match self.tokens.next_token() {
                Ok(Some(token)) => token,
                Ok(None) => break,
                Err(err) => return Err(DecodeError::new(batch, err)),
            };
            if token.is_empty() {
                continue;
            }

            let raw_len = token.len() as u64;
            let record = match self.transform.transform(token) {
                Ok(record) => record,
                Err(err) => return Err(DecodeError::new(batch, err)),
            };
            batch.push_record(record);

            self.tracker.increment_items(1);
            self.tracker.increment_bytes(raw_len);

            if self.tracker.should_flush() {
                trace!(
                    offset = self.tokens.offset(),
                    records = batch.len(),
                    "delimited decoder flush threshold reached"
                );
                self.tracker.reset();
                return Ok(Some(batch));
            }
        }

        if batch.is_empty() {
            return Ok(None);
        }
        Ok(Some(batch))
    }

    /// Raw bytes consumed so far, including the initial offset
    pub fn offset(&self) -> u64 {
        self.tokens.offset()
    }

    /// Options this decoder was built with
    pub fn options(&self) -> DecoderOptions {
        self.tracker.options()
    }
}

impl<R, T, X, B> BatchDecoder for DelimitedDecoder<R, T, X, B>
where
    R: Read,
    T: Tokenizer,
    X: RecordTransform,
    B: RecordBatch<Record = X::Output>,
{
    type Batch = B;

    fn decode(&mut self) -> std::result::Result<Option<B>, DecodeError<B>> {
        DelimitedDecoder::decode(self)
    }

    fn offset(&self) -> u64 {
        DelimitedDecoder::offset(self)
    }
}
