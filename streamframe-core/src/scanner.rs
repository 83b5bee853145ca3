//! Newline delimited record scanning with flush decisions

use crate::batch::BatchTracker;
use crate::error::{Result, StreamError};
use crate::options::DecoderOptions;
use std::io::{self, BufRead, BufReader, Read};
use tracing::{debug, trace};

const NEWLINE: u8 = b'\n';

/// Outcome of a single scan call
///
/// Exactly one of three shapes is produced:
/// - a record, `eof == false`: more data may follow
/// - a record, `eof == true`: the last record had no trailing newline
/// - no record, `eof == true`, `flush == true`: the stream is exhausted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned<T> {
    /// The trimmed record, if one was read
    pub record: Option<T>,
    /// Whether the batch in progress should be flushed after this record
    pub flush: bool,
    /// Whether the source is exhausted
    pub eof: bool,
}

impl<T> Scanned<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Scanned<U> {
        Scanned {
            record: self.record.map(f),
            flush: self.flush,
            eof: self.eof,
        }
    }
}

/// Scans newline delimited records from a buffered reader
///
/// Offsets count raw bytes consumed from the reader, newline included,
/// independently of the whitespace trimming applied to returned records.
/// Not safe for concurrent use.
pub struct LineScanner<B> {
    tracker: BatchTracker,
    reader: B,
    line: Vec<u8>,
    offset: u64,
}

impl<R: Read> LineScanner<BufReader<R>> {
    /// Create a scanner over an unbuffered reader
    ///
    /// The reader is wrapped in a [`BufReader`] with the default capacity.
    /// Use [`LineScanner::from_buf_read`] to keep an existing buffer.
    pub fn new(reader: R, options: DecoderOptions) -> Result<Self> {
        Self::from_buf_read(BufReader::new(reader), options)
    }
}

impl<B: BufRead> LineScanner<B> {
    /// Create a scanner over a reader that is already buffered
    ///
    /// A non-zero `options.offset` is discarded from the reader before
    /// returning. Fewer available bytes than requested is an error.
    pub fn from_buf_read(mut reader: B, options: DecoderOptions) -> Result<Self> {
        if options.offset > 0 {
            discard(&mut reader, options.offset).map_err(|source| StreamError::OffsetDiscard {
                offset: options.offset,
                source,
            })?;
        }

        debug!(
            offset = options.offset,
            flush_bytes = options.flush_bytes,
            flush_items = options.flush_items,
            "line scanner ready"
        );

        Ok(Self {
            tracker: BatchTracker::new(options),
            reader,
            line: Vec::new(),
            offset: options.offset,
        })
    }

    /// Scan the next record as a view into the scanner's buffer
    ///
    /// The slice is only valid until the next scan call.
    pub fn scan_slice(&mut self) -> Result<Scanned<&[u8]>> {
        self.line.clear();
        let read = self
            .reader
            .read_until(NEWLINE, &mut self.line)
            .map_err(StreamError::Read)?;

        if read == 0 {
            debug!(offset = self.offset, "line scanner reached end of stream");
            return Ok(Scanned {
                record: None,
                flush: true,
                eof: true,
            });
        }

        // Only a final record without a trailing newline ends short of it.
        let eof = self.line.last() != Some(&NEWLINE);
        let raw_len = self.line.len() as u64;

        self.offset += raw_len;
        self.tracker.increment_bytes(raw_len);
        self.tracker.increment_items(1);

        let flush = self.tracker.should_flush();
        if flush {
            trace!(offset = self.offset, "line scanner flush threshold reached");
            self.tracker.reset();
        }

        Ok(Scanned {
            record: Some(trim_space(&self.line)),
            flush,
            eof,
        })
    }

    /// Scan the next record as an owned copy of its bytes
    pub fn scan_bytes(&mut self) -> Result<Scanned<Vec<u8>>> {
        Ok(self.scan_slice()?.map(<[u8]>::to_vec))
    }

    /// Scan the next record as text
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn scan_string(&mut self) -> Result<Scanned<String>> {
        Ok(self
            .scan_slice()?
            .map(|raw| String::from_utf8_lossy(raw).into_owned()))
    }

    /// Raw bytes consumed from the stream so far, including the initial offset
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Options this scanner was built with
    pub fn options(&self) -> DecoderOptions {
        self.tracker.options()
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &B {
        &self.reader
    }
}

/// Strip leading and trailing whitespace from a raw line
///
/// Unicode whitespace is removed when the line is valid UTF-8. Otherwise only
/// ASCII whitespace is.
fn trim_space(raw: &[u8]) -> &[u8] {
    let raw = raw.trim_ascii();
    match std::str::from_utf8(raw) {
        Ok(text) => text.trim().as_bytes(),
        Err(_) => raw,
    }
}

/// Skip exactly `n` bytes of a buffered reader
fn discard<B: BufRead>(reader: &mut B, n: u64) -> io::Result<()> {
    let mut remaining = n;
    while remaining > 0 {
        let available = match reader.fill_buf() {
            Ok(buf) => buf.len(),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream ended {remaining} bytes short"),
            ));
        }
        let step = available.min(usize::try_from(remaining).unwrap_or(usize::MAX));
        reader.consume(step);
        remaining -= step as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scanner(input: &str, options: DecoderOptions) -> LineScanner<BufReader<Cursor<Vec<u8>>>> {
        LineScanner::new(Cursor::new(input.as_bytes().to_vec()), options).unwrap()
    }

    #[test]
    fn test_existing_buf_reader_is_kept() {
        let reader = BufReader::with_capacity(3, Cursor::new(b"test".to_vec()));
        let scanner = LineScanner::from_buf_read(reader, DecoderOptions::default()).unwrap();
        assert_eq!(scanner.get_ref().capacity(), 3);
    }

    #[test]
    fn test_offset_past_end_is_rejected() {
        let result = LineScanner::new(
            Cursor::new(b"test".to_vec()),
            DecoderOptions::default().with_offset(10),
        );
        match result {
            Err(err @ StreamError::OffsetDiscard { offset: 10, .. }) => {
                assert!(err.to_string().contains("failed to discard offset 10"));
            }
            other => panic!("expected OffsetDiscard, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_scan_string() {
        let mut scanner = scanner("line1\nline2\nline3\n", DecoderOptions::default());

        for (expected, offset) in [("line1", 6), ("line2", 12), ("line3", 18)] {
            let scanned = scanner.scan_string().unwrap();
            assert_eq!(scanned.record.as_deref(), Some(expected));
            assert!(!scanned.flush);
            assert!(!scanned.eof);
            assert_eq!(scanner.offset(), offset);
        }

        let scanned = scanner.scan_string().unwrap();
        assert_eq!(scanned.record, None);
        assert!(scanned.flush);
        assert!(scanned.eof);
        assert_eq!(scanner.offset(), 18);
    }

    #[test]
    fn test_unicode_whitespace_is_trimmed() {
        let mut scanner = scanner("\u{3000}wide\u{a0}\r\n\u{2003}\n", DecoderOptions::default());

        assert_eq!(scanner.scan_string().unwrap().record.as_deref(), Some("wide"));
        assert_eq!(scanner.offset(), 11);
        assert_eq!(scanner.scan_string().unwrap().record.as_deref(), Some(""));
        assert_eq!(scanner.offset(), 15);
    }

    #[test]
    fn test_invalid_utf8_line_trims_ascii_only() {
        let mut scanner = LineScanner::new(
            Cursor::new(b"  \xff data \t\n".to_vec()),
            DecoderOptions::default(),
        )
        .unwrap();
        assert_eq!(scanner.scan_bytes().unwrap().record, Some(b"\xff data".to_vec()));
    }

    #[test]
    fn test_scan_bytes() {
        let mut scanner = scanner("line1\nline2\nline3\n", DecoderOptions::default());

        assert_eq!(scanner.scan_bytes().unwrap().record, Some(b"line1".to_vec()));
        assert_eq!(scanner.offset(), 6);
        assert_eq!(scanner.scan_bytes().unwrap().record, Some(b"line2".to_vec()));
        assert_eq!(scanner.offset(), 12);
        assert_eq!(scanner.scan_bytes().unwrap().record, Some(b"line3".to_vec()));
        assert_eq!(scanner.offset(), 18);

        let scanned = scanner.scan_bytes().unwrap();
        assert!(scanned.eof && scanned.flush && scanned.record.is_none());
    }

    #[test]
    fn test_initial_offset() {
        let mut scanner = scanner(
            "line1\nline2\nline3\n",
            DecoderOptions::default().with_offset(6),
        );
        assert_eq!(scanner.offset(), 6);

        let scanned = scanner.scan_string().unwrap();
        assert_eq!(scanned.record.as_deref(), Some("line2"));
        assert_eq!(scanner.offset(), 12);
    }

    #[test]
    fn test_last_record_without_newline() {
        let mut scanner = scanner("a\nlast", DecoderOptions::default());
        assert_eq!(scanner.scan_string().unwrap().record.as_deref(), Some("a"));

        let scanned = scanner.scan_string().unwrap();
        assert_eq!(scanned.record.as_deref(), Some("last"));
        assert!(scanned.eof);
        assert_eq!(scanner.offset(), 6);

        let scanned = scanner.scan_string().unwrap();
        assert!(scanned.record.is_none() && scanned.eof && scanned.flush);
    }

    #[test]
    fn test_trimming_does_not_change_offset() {
        let mut scanner = scanner("  padded \r\n", DecoderOptions::default());
        let scanned = scanner.scan_string().unwrap();
        assert_eq!(scanned.record.as_deref(), Some("padded"));
        assert_eq!(scanner.offset(), 11);
    }

    #[test]
    fn test_flush_by_items_resets() {
        let mut scanner = scanner(
            "a\nb\nc\nd\n",
            DecoderOptions::default().with_flush_bytes(0).with_flush_items(2),
        );
        let flags: Vec<bool> = (0..4).map(|_| scanner.scan_bytes().unwrap().flush).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn test_flush_by_bytes_counts_newline() {
        let mut scanner = scanner(
            "abcd\nef\n",
            DecoderOptions::default().with_flush_bytes(5).with_flush_items(0),
        );
        assert!(scanner.scan_bytes().unwrap().flush);
        assert!(!scanner.scan_bytes().unwrap().flush);
    }

    #[test]
    fn test_scan_slice_borrows_buffer() {
        let mut scanner = scanner("x\ny\n", DecoderOptions::default());
        let first = scanner.scan_slice().unwrap().record.map(<[u8]>::to_vec);
        let second = scanner.scan_slice().unwrap().record.map(<[u8]>::to_vec);
        assert_eq!(first.as_deref(), Some(&b"x"[..]));
        assert_eq!(second.as_deref(), Some(&b"y"[..]));
    }

    #[test]
    fn test_read_error_passes_through() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        let mut scanner = LineScanner::new(Failing, DecoderOptions::default()).unwrap();
        match scanner.scan_bytes() {
            Err(StreamError::Read(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
