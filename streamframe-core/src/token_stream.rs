//! Buffered scanning loop that drives a [`Tokenizer`]

use crate::error::{Result, StreamError};
use crate::tokenizer::Tokenizer;
use std::io::{self, Read};
use tracing::debug;

/// Largest token accepted by default, separator excluded (16 MiB)
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 16 * 1024 * 1024;

/// Bytes the buffer may hold past the token limit, so the separator or end
/// of stream after a record of exactly the limit can still be observed
pub const SEPARATOR_ALLOWANCE: usize = 256;

const INITIAL_BUFFER_SIZE: usize = 4096;

/// Reads a stream in chunks and hands buffered data to a tokenizer
///
/// The offset counts every byte a tokenizer consumed, separators included,
/// plus the initial offset skipped at construction.
pub struct TokenStream<R, T> {
    reader: R,
    tokenizer: T,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    eof: bool,
    offset: u64,
    max_token_size: usize,
}

impl<R: Read, T: Tokenizer> TokenStream<R, T> {
    /// Create a token stream, skipping `offset` bytes of `reader` first
    pub fn new(mut reader: R, tokenizer: T, offset: u64) -> Result<Self> {
        if offset > 0 {
            let skipped = io::copy(&mut (&mut reader).take(offset), &mut io::sink())
                .map_err(|source| StreamError::OffsetDiscard { offset, source })?;
            if skipped < offset {
                return Err(StreamError::OffsetDiscard {
                    offset,
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("stream ended {} bytes short", offset - skipped),
                    ),
                });
            }
        }

        Ok(Self {
            reader,
            tokenizer,
            buf: Vec::new(),
            start: 0,
            end: 0,
            eof: false,
            offset,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
        })
    }

    /// Set the largest token accepted, separator excluded
    pub fn with_max_token_size(mut self, limit: usize) -> Self {
        self.max_token_size = limit.max(1);
        self
    }

    /// Return the next token, or `None` once the stream is exhausted
    ///
    /// The slice is only valid until the next call.
    pub fn next_token(&mut self) -> Result<Option<&[u8]>> {
        loop {
            if self.end > self.start || self.eof {
                let data = &self.buf[self.start..self.end];
                if let Some(token) = self.tokenizer.split(data, self.eof)? {
                    // A tokenizer that neither advances nor stops would spin forever.
                    if token.advance > 0 {
                        if token.len > self.max_token_size {
                            return Err(StreamError::TokenTooLong {
                                limit: self.max_token_size,
                            });
                        }
                        let begin = self.start;
                        self.start += token.advance;
                        self.offset += token.advance as u64;
                        return Ok(Some(&self.buf[begin..begin + token.len]));
                    }
                }
                if self.eof {
                    debug!(offset = self.offset, "token stream reached end of stream");
                    return Ok(None);
                }
            }
            self.fill()?;
        }
    }

    /// Raw bytes consumed so far, including the initial offset
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read more input, compacting or growing the buffer as needed
    fn fill(&mut self) -> Result<()> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        if self.end == self.buf.len() {
            let capacity = self.max_token_size.saturating_add(SEPARATOR_ALLOWANCE);
            if self.buf.len() >= capacity {
                return Err(StreamError::TokenTooLong {
                    limit: self.max_token_size,
                });
            }
            let grown = (self.buf.len() * 2)
                .max(INITIAL_BUFFER_SIZE)
                .min(capacity);
            self.buf.resize(grown, 0);
        }

        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Read(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{NewlineTokenizer, PatternTokenizer, RemainderTokenizer};
    use regex::bytes::Regex;
    use std::io::Cursor;

    fn collect<T: Tokenizer>(stream: &mut TokenStream<Cursor<&[u8]>, T>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(token) = stream.next_token().unwrap() {
            out.push(String::from_utf8_lossy(token).into_owned());
        }
        out
    }

    #[test]
    fn test_tokens_and_offset() {
        let data: &[u8] = b"one\ntwo\nthree";
        let mut stream = TokenStream::new(Cursor::new(data), NewlineTokenizer, 0).unwrap();
        assert_eq!(collect(&mut stream), vec!["one", "two", "three"]);
        assert_eq!(stream.offset(), data.len() as u64);
    }

    #[test]
    fn test_initial_offset_is_skipped() {
        let data: &[u8] = b"one\ntwo\n";
        let mut stream = TokenStream::new(Cursor::new(data), NewlineTokenizer, 4).unwrap();
        assert_eq!(stream.offset(), 4);
        assert_eq!(collect(&mut stream), vec!["two"]);
        assert_eq!(stream.offset(), 8);
    }

    #[test]
    fn test_offset_past_end() {
        let data: &[u8] = b"abc";
        let result = TokenStream::new(Cursor::new(data), NewlineTokenizer, 4);
        assert!(matches!(
            result,
            Err(StreamError::OffsetDiscard { offset: 4, .. })
        ));
    }

    #[test]
    fn test_buffer_grows_across_reads() {
        let data = vec![b'x'; INITIAL_BUFFER_SIZE * 3];
        let mut stream =
            TokenStream::new(Cursor::new(data.as_slice()), RemainderTokenizer, 0).unwrap();
        let token = stream.next_token().unwrap().unwrap();
        assert_eq!(token.len(), INITIAL_BUFFER_SIZE * 3);
        assert!(stream.next_token().unwrap().is_none());
    }

    #[test]
    fn test_token_too_long() {
        let data: &[u8] = b"0123456789";
        let mut stream = TokenStream::new(Cursor::new(data), NewlineTokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert!(matches!(
            stream.next_token(),
            Err(StreamError::TokenTooLong { limit: 4 })
        ));
    }

    #[test]
    fn test_record_of_exactly_the_limit() {
        let data: &[u8] = b"0123";
        let mut stream = TokenStream::new(Cursor::new(data), RemainderTokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert_eq!(stream.next_token().unwrap().unwrap(), b"0123");

        let data: &[u8] = b"0123\nab\n";
        let mut stream = TokenStream::new(Cursor::new(data), NewlineTokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert_eq!(collect(&mut stream), vec!["0123", "ab"]);
        assert_eq!(stream.offset(), 8);
    }

    #[test]
    fn test_limit_excludes_separator() {
        let data: &[u8] = b"0123\r\nab";
        let tokenizer = PatternTokenizer::new(Regex::new(r"\r\n").unwrap());
        let mut stream = TokenStream::new(Cursor::new(data), tokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert_eq!(collect(&mut stream), vec!["0123", "ab"]);
    }

    #[test]
    fn test_record_one_past_the_limit() {
        let data: &[u8] = b"01234";
        let mut stream = TokenStream::new(Cursor::new(data), RemainderTokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert!(matches!(
            stream.next_token(),
            Err(StreamError::TokenTooLong { limit: 4 })
        ));

        let data: &[u8] = b"ab\n01234\n";
        let mut stream = TokenStream::new(Cursor::new(data), NewlineTokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert_eq!(stream.next_token().unwrap().unwrap(), b"ab");
        assert!(matches!(
            stream.next_token(),
            Err(StreamError::TokenTooLong { limit: 4 })
        ));
        assert_eq!(stream.offset(), 3);
    }

    #[test]
    fn test_unterminated_record_beyond_buffer() {
        let data = vec![b'x'; 4 + SEPARATOR_ALLOWANCE + 1];
        let mut stream = TokenStream::new(Cursor::new(data.as_slice()), NewlineTokenizer, 0)
            .unwrap()
            .with_max_token_size(4);
        assert!(matches!(
            stream.next_token(),
            Err(StreamError::TokenTooLong { limit: 4 })
        ));
    }

    #[test]
    fn test_empty_stream() {
        let data: &[u8] = b"";
        let mut stream = TokenStream::new(Cursor::new(data), RemainderTokenizer, 0).unwrap();
        assert!(stream.next_token().unwrap().is_none());
        assert!(stream.next_token().unwrap().is_none());
        assert_eq!(stream.offset(), 0);
    }
}
