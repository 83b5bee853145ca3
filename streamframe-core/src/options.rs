//! Decoder configuration

use serde::{Deserialize, Serialize};

/// Default byte threshold for flushing a batch (1 MiB)
pub const DEFAULT_FLUSH_BYTES: u64 = 1024 * 1024;

/// Default item threshold for flushing a batch
pub const DEFAULT_FLUSH_ITEMS: u64 = 1000;

/// Flush thresholds and initial offset for a decoding session
///
/// A threshold of `0` disables that trigger. The meaning of `offset` is bytes
/// for every decoder in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Flush once this many bytes were accumulated (0 = disabled)
    pub flush_bytes: u64,
    /// Flush once this many records were accumulated (0 = disabled)
    pub flush_items: u64,
    /// Bytes to skip before the first record
    pub offset: u64,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            flush_bytes: DEFAULT_FLUSH_BYTES,
            flush_items: DEFAULT_FLUSH_ITEMS,
            offset: 0,
        }
    }
}

impl DecoderOptions {
    /// Build options from the defaults and an ordered list of overrides
    ///
    /// Later entries win when two of them set the same field.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = DecoderOption>,
    {
        let mut resolved = Self::default();
        for option in options {
            option.apply(&mut resolved);
        }
        resolved
    }

    /// Set the byte threshold (0 disables flushing by bytes)
    pub fn with_flush_bytes(mut self, bytes: u64) -> Self {
        self.flush_bytes = bytes;
        self
    }

    /// Set the item threshold (0 disables flushing by items)
    pub fn with_flush_items(mut self, items: u64) -> Self {
        self.flush_items = items;
        self
    }

    /// Set the initial stream offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Disable both thresholds so only end of stream completes a batch
    pub fn unbounded(self) -> Self {
        self.with_flush_bytes(0).with_flush_items(0)
    }
}

/// A single override applied on top of [`DecoderOptions::default`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderOption {
    /// Override `flush_bytes`
    FlushBytes(u64),
    /// Override `flush_items`
    FlushItems(u64),
    /// Override `offset`
    Offset(u64),
}

impl DecoderOption {
    /// Write this override into `options`
    pub fn apply(self, options: &mut DecoderOptions) {
        match self {
            DecoderOption::FlushBytes(bytes) => options.flush_bytes = bytes,
            DecoderOption::FlushItems(items) => options.flush_items = items,
            DecoderOption::Offset(offset) => options.offset = offset,
        }
    }
}
