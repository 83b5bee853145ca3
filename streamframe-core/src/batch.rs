//! Flush threshold tracking

use crate::options::DecoderOptions;

/// Accumulates byte and item counts and decides when a batch is full
///
/// The tracker never resets itself. The owner calls [`reset`](Self::reset)
/// after acting on a `true` from [`should_flush`](Self::should_flush).
/// Not safe for concurrent use.
#[derive(Debug, Clone)]
pub struct BatchTracker {
    options: DecoderOptions,
    current_bytes: u64,
    current_items: u64,
}

impl BatchTracker {
    /// Create a tracker with zeroed counters
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            options,
            current_bytes: 0,
            current_items: 0,
        }
    }

    /// Add `n` to the byte count
    pub fn increment_bytes(&mut self, n: u64) {
        self.current_bytes += n;
    }

    /// Add `n` to the item count
    pub fn increment_items(&mut self, n: u64) {
        self.current_items += n;
    }

    /// Whether either enabled threshold has been reached
    pub fn should_flush(&self) -> bool {
        if self.options.flush_bytes > 0 && self.current_bytes >= self.options.flush_bytes {
            return true;
        }
        self.options.flush_items > 0 && self.current_items >= self.options.flush_items
    }

    /// Zero both counters
    pub fn reset(&mut self) {
        self.current_bytes = 0;
        self.current_items = 0;
    }

    /// Bytes accumulated since the last reset
    pub fn current_bytes(&self) -> u64 {
        self.current_bytes
    }

    /// Items accumulated since the last reset
    pub fn current_items(&self) -> u64 {
        self.current_items
    }

    /// Options this tracker was built with
    pub fn options(&self) -> DecoderOptions {
        self.options
    }
}

impl Default for BatchTracker {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}
