//! Collaborator contracts for records and batches

use crate::error::Result;

/// Append-only container that collects decoded records between flushes
pub trait RecordBatch: Default {
    /// The record type stored in the batch
    type Record;

    /// Append a record at the end of the batch
    fn push_record(&mut self, record: Self::Record);

    /// Number of records in the batch
    fn len(&self) -> usize;

    /// Check if the batch holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all records
    fn clear(&mut self);
}

impl<T> RecordBatch for Vec<T> {
    type Record = T;

    fn push_record(&mut self, record: T) {
        self.push(record);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Turns one raw token into a record (character set decoding, parsing, ...)
pub trait RecordTransform {
    /// The produced record
    type Output;

    /// Transform a raw token
    fn transform(&mut self, raw: &[u8]) -> Result<Self::Output>;
}

impl<F, O> RecordTransform for F
where
    F: FnMut(&[u8]) -> Result<O>,
{
    type Output = O;

    fn transform(&mut self, raw: &[u8]) -> Result<O> {
        self(raw)
    }
}

/// Concatenate records with `separator` strictly between them
///
/// No separator is written before the first or after the last record, and
/// an empty input produces an empty output.
pub fn join_records<I, T>(records: I, separator: &[u8]) -> Vec<u8>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut out = Vec::new();
    for (i, record) in records.into_iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(separator);
        }
        out.extend_from_slice(record.as_ref());
    }
    out
}
