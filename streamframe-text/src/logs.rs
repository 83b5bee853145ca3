//! Log record container

use chrono::{DateTime, Utc};
use serde::Serialize;
use streamframe_core::RecordBatch;

/// A single decoded log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Decoded record text
    pub body: String,
    /// When the record was read from the stream
    pub observed_time: DateTime<Utc>,
}

/// An ordered batch of log records
///
/// Records appended through [`RecordBatch::push_record`] share the batch's
/// observed time, which is taken when the batch is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogBatch {
    observed_time: DateTime<Utc>,
    records: Vec<LogRecord>,
}

impl Default for LogBatch {
    fn default() -> Self {
        Self::with_observed_time(Utc::now())
    }
}

impl LogBatch {
    /// Create an empty batch observed now
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty batch with a fixed observed time
    pub fn with_observed_time(observed_time: DateTime<Utc>) -> Self {
        Self {
            observed_time,
            records: Vec::new(),
        }
    }

    /// Observed time given to appended records
    pub fn observed_time(&self) -> DateTime<Utc> {
        self.observed_time
    }

    /// Records in append order
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Record bodies in append order
    pub fn bodies(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.body.as_str())
    }

    /// Append a fully built record
    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    /// Consume the batch and return its records
    pub fn into_records(self) -> Vec<LogRecord> {
        self.records
    }
}

impl RecordBatch for LogBatch {
    type Record = String;

    fn push_record(&mut self, body: String) {
        self.records.push(LogRecord {
            body,
            observed_time: self.observed_time,
        });
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for LogBatch {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut batch = LogBatch::new();
        for body in iter {
            batch.push_record(body.into());
        }
        batch
    }
}
