//! Line scanner backed log decoding

use crate::charset::Charset;
use crate::logs::LogBatch;
use std::io::{BufRead, BufReader};
use streamframe_core::{DecodeError, DecoderAdapter, LineScanner, RecordBatch, RecordTransform};

/// Scanner state behind a [`LineLogsDecoder`]
pub struct LineLogState<B> {
    scanner: LineScanner<B>,
    charset: Charset,
}

impl<B: BufRead> LineLogState<B> {
    /// Pair a scanner with the charset applied to each line
    pub fn new(scanner: LineScanner<B>, charset: Charset) -> Self {
        Self { scanner, charset }
    }

    /// Offset of the underlying scanner
    pub fn offset(&self) -> u64 {
        self.scanner.offset()
    }
}

/// Decode step driven by a [`LineLogsDecoder`]
pub type DecodeLinesFn<B> =
    fn(&mut LineLogState<B>) -> Result<Option<LogBatch>, DecodeError<LogBatch>>;
/// Offset accessor of a [`LineLogsDecoder`]
pub type OffsetFn<B> = fn(&LineLogState<B>) -> u64;

/// Log decoder over a [`LineScanner`], see
/// [`TextLogCodec::new_line_logs_decoder`](crate::TextLogCodec::new_line_logs_decoder)
pub type LineLogsDecoder<R> = DecoderAdapter<
    LineLogState<BufReader<R>>,
    LogBatch,
    DecodeLinesFn<BufReader<R>>,
    OffsetFn<BufReader<R>>,
>;

pub(crate) fn line_logs_decoder<R: std::io::Read>(
    scanner: LineScanner<BufReader<R>>,
    charset: Charset,
) -> LineLogsDecoder<R> {
    DecoderAdapter::new(
        LineLogState::new(scanner, charset),
        decode_lines as DecodeLinesFn<BufReader<R>>,
        LineLogState::offset as OffsetFn<BufReader<R>>,
    )
}

/// Collect lines until the scanner asks for a flush or the stream ends
fn decode_lines<B: BufRead>(
    state: &mut LineLogState<B>,
) -> Result<Option<LogBatch>, DecodeError<LogBatch>> {
    let mut batch = LogBatch::new();

    loop {
        let scanned = match state.scanner.scan_slice() {
            Ok(scanned) => scanned,
            Err(err) => return Err(DecodeError::new(batch, err)),
        };

        if let Some(raw) = scanned.record.filter(|raw| !raw.is_empty()) {
            match state.charset.transform(raw) {
                Ok(body) => batch.push_record(body),
                Err(err) => return Err(DecodeError::new(batch, err)),
            }
        }

        // Blank lines count toward the thresholds but are never emitted, so a
        // flush with nothing collected keeps reading.
        if scanned.eof || (scanned.flush && !batch.is_empty()) {
            break;
        }
    }

    if batch.is_empty() {
        return Ok(None);
    }
    Ok(Some(batch))
}
