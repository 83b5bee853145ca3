//! Output formatting module

use anyhow::Result;
use std::io::Write;
use streamframe_text::LogBatch;

pub mod json;
pub mod text;

pub use json::JsonLinesFormatter;
pub use text::TextFormatter;

/// Trait for batch formatters
pub trait BatchFormatter {
    /// Write one decoded batch and the offset reached after it
    fn format_batch(&mut self, batch: &LogBatch, offset: u64) -> Result<()>;

    /// Flush buffered output
    fn finish(&mut self) -> Result<()>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per batch
    Jsonl,
    /// A header line per batch followed by its records
    Text,
}

impl OutputFormat {
    /// Create the formatter for this format
    pub fn formatter<'a, W: Write + 'a>(self, writer: W) -> Box<dyn BatchFormatter + 'a> {
        match self {
            OutputFormat::Jsonl => Box::new(JsonLinesFormatter::new(writer)),
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        }
    }
}
