//! JSON Lines output formatter

use super::BatchFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use streamframe_core::RecordBatch;
use streamframe_text::LogBatch;

/// Data structure for one output line
#[derive(Debug, Serialize)]
pub struct BatchData<'a> {
    /// Offset after the batch
    pub offset: u64,
    /// Number of records in the batch
    pub count: usize,
    /// Observed time shared by the records, RFC 3339
    pub observed_time: String,
    /// Record bodies in stream order
    pub records: Vec<&'a str>,
}

/// JSON Lines formatter - one object per batch
pub struct JsonLinesFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesFormatter<W> {
    /// Create a new JSON Lines formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> BatchFormatter for JsonLinesFormatter<W> {
    fn format_batch(&mut self, batch: &LogBatch, offset: u64) -> Result<()> {
        let data = BatchData {
            offset,
            count: batch.len(),
            observed_time: batch.observed_time().to_rfc3339(),
            records: batch.bodies().collect(),
        };
        serde_json::to_writer(&mut self.writer, &data)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_batch() {
        let mut out = Vec::new();
        {
            let mut formatter = JsonLinesFormatter::new(&mut out);
            let first: LogBatch = ["a", "b"].into_iter().collect();
            let second: LogBatch = ["c"].into_iter().collect();
            formatter.format_batch(&first, 4).unwrap();
            formatter.format_batch(&second, 6).unwrap();
            formatter.finish().unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["offset"], 4);
        assert_eq!(lines[0]["records"], serde_json::json!(["a", "b"]));
        assert_eq!(lines[1]["count"], 1);
    }
}
