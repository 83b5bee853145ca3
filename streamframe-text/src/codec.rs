//! Text log codec

use crate::charset::Charset;
use crate::error::Result;
use crate::lines::{self, LineLogsDecoder};
use crate::logs::LogBatch;
use std::io::Read;
use streamframe_core::{
    join_records, DecoderOptions, DelimitedDecoder, LineScanner, Separator, Tokenizer,
    DEFAULT_MAX_TOKEN_SIZE,
};
use tracing::debug;

/// Stream decoder returned by [`TextLogCodec::new_logs_decoder`]
pub type TextLogsDecoder<R> = DelimitedDecoder<R, Box<dyn Tokenizer + Send>, Charset, LogBatch>;

/// Marshals and unmarshals plain text logs
#[derive(Debug, Clone)]
pub struct TextLogCodec {
    charset: Charset,
    marshaling_separator: String,
    separator: Separator,
    max_record_size: usize,
}

impl Default for TextLogCodec {
    fn default() -> Self {
        Self::new(Charset::utf8(), "\n", Separator::Newline)
    }
}

impl TextLogCodec {
    /// Create a codec
    pub fn new(
        charset: Charset,
        marshaling_separator: impl Into<String>,
        separator: Separator,
    ) -> Self {
        Self {
            charset,
            marshaling_separator: marshaling_separator.into(),
            separator,
            max_record_size: DEFAULT_MAX_TOKEN_SIZE,
        }
    }

    /// Set the largest record the stream decoder buffers
    pub fn with_max_record_size(mut self, limit: usize) -> Self {
        self.max_record_size = limit;
        self
    }

    /// Character set applied to each record
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Decode a stream split on the unmarshaling separator
    ///
    /// The decoder's offset counts bytes, separators included.
    pub fn new_logs_decoder<R: Read>(
        &self,
        reader: R,
        options: DecoderOptions,
    ) -> Result<TextLogsDecoder<R>> {
        debug!(
            charset = self.charset.name(),
            separator = ?self.separator,
            "creating text logs decoder"
        );
        let decoder =
            DelimitedDecoder::new(reader, self.separator.tokenizer(), self.charset, options)?;
        Ok(decoder.with_max_token_size(self.max_record_size))
    }

    /// Decode a newline delimited stream through a [`LineScanner`]
    ///
    /// Records are trimmed and blank lines are skipped. The unmarshaling
    /// separator is ignored.
    pub fn new_line_logs_decoder<R: Read>(
        &self,
        reader: R,
        options: DecoderOptions,
    ) -> Result<LineLogsDecoder<R>> {
        let scanner = LineScanner::new(reader, options)?;
        Ok(lines::line_logs_decoder(scanner, self.charset))
    }

    /// Decode a complete in-memory payload as one batch
    ///
    /// Both flush thresholds are disabled so a single call drains the input.
    /// An empty payload yields an empty batch.
    pub fn unmarshal_logs(&self, buf: &[u8]) -> Result<LogBatch> {
        let options = DecoderOptions::default().unbounded().with_offset(0);
        let mut decoder = self.new_logs_decoder(buf, options)?;
        match decoder.decode() {
            Ok(Some(batch)) => Ok(batch),
            Ok(None) => Ok(LogBatch::new()),
            Err(err) => Err(err.into_source().into()),
        }
    }

    /// Join record bodies with the marshaling separator
    pub fn marshal_logs(&self, logs: &LogBatch) -> Vec<u8> {
        join_records(logs.bodies(), self.marshaling_separator.as_bytes())
    }
}
