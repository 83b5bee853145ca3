//! Plain text output formatter

use super::BatchFormatter;
use anyhow::Result;
use std::io::Write;
use streamframe_core::RecordBatch;
use streamframe_text::LogBatch;

/// Plain text formatter - a header per batch, then one record per line
pub struct TextFormatter<W: Write> {
    writer: W,
    batches: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer, batches: 0 }
    }
}

impl<W: Write> BatchFormatter for TextFormatter<W> {
    fn format_batch(&mut self, batch: &LogBatch, offset: u64) -> Result<()> {
        self.batches += 1;
        writeln!(
            self.writer,
            "# batch {} offset={} records={}",
            self.batches,
            offset,
            batch.len()
        )?;
        for body in batch.bodies() {
            writeln!(self.writer, "{body}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
