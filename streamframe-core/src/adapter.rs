//! Uniform "decode next batch + report offset" handle

use crate::error::DecodeError;
use std::marker::PhantomData;

/// Decodes a stream into batches, one batch per call
///
/// Callers loop until `decode` returns `Ok(None)`. The last batch holding
/// data always comes back as `Ok(Some(_))`; end of stream is reported on the
/// call after it. This holds for every batch type, so log and metric
/// decoders share the trait and differ only in `Batch`.
pub trait BatchDecoder {
    /// The batch container produced by each call
    type Batch;

    /// Decode the next batch, or return `None` once the stream is exhausted
    fn decode(&mut self) -> Result<Option<Self::Batch>, DecodeError<Self::Batch>>;

    /// Offset after the most recent batch, or the initial offset
    ///
    /// Feeding this value back as the initial offset of a new session
    /// resumes the stream right after the last decoded record.
    fn offset(&self) -> u64;

    /// Iterate over the remaining batches
    fn batches(self) -> Batches<Self>
    where
        Self: Sized,
    {
        Batches {
            decoder: self,
            done: false,
        }
    }
}

impl<D: BatchDecoder + ?Sized> BatchDecoder for Box<D> {
    type Batch = D::Batch;

    fn decode(&mut self) -> Result<Option<Self::Batch>, DecodeError<Self::Batch>> {
        (**self).decode()
    }

    fn offset(&self) -> u64 {
        (**self).offset()
    }
}

/// Iterator over the batches of a [`BatchDecoder`]
///
/// Iteration stops after end of stream or after the first error.
pub struct Batches<D> {
    decoder: D,
    done: bool,
}

impl<D: BatchDecoder> Batches<D> {
    /// Offset of the underlying decoder
    pub fn offset(&self) -> u64 {
        self.decoder.offset()
    }

    /// Recover the decoder
    pub fn into_inner(self) -> D {
        self.decoder
    }
}

impl<D: BatchDecoder> Iterator for Batches<D> {
    type Item = Result<D::Batch, DecodeError<D::Batch>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.decode() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Binds a state value and two callables into a [`BatchDecoder`]
///
/// The adapter adds no buffering. `decode` must follow the trait's protocol
/// on its own.
pub struct DecoderAdapter<S, B, D, O> {
    state: S,
    decode: D,
    offset: O,
    _batch: PhantomData<fn() -> B>,
}

impl<S, B, D, O> DecoderAdapter<S, B, D, O>
where
    D: FnMut(&mut S) -> Result<Option<B>, DecodeError<B>>,
    O: Fn(&S) -> u64,
{
    /// Create an adapter over `state`
    pub fn new(state: S, decode: D, offset: O) -> Self {
        Self {
            state,
            decode,
            offset,
            _batch: PhantomData,
        }
    }

    /// Get a reference to the wrapped state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Recover the wrapped state
    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S, B, D, O> BatchDecoder for DecoderAdapter<S, B, D, O>
where
    D: FnMut(&mut S) -> Result<Option<B>, DecodeError<B>>,
    O: Fn(&S) -> u64,
{
    type Batch = B;

    fn decode(&mut self) -> Result<Option<B>, DecodeError<B>> {
        (self.decode)(&mut self.state)
    }

    fn offset(&self) -> u64 {
        (self.offset)(&self.state)
    }
}
