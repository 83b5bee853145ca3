//! Pluggable record boundary strategies

use crate::error::Result;
use regex::bytes::Regex;

/// A record boundary found by a [`Tokenizer`]
///
/// The record is `data[..len]` and `advance` bytes are consumed from the
/// stream, so `len <= advance` always holds. Separator bytes sit between
/// `len` and `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Bytes consumed from the buffered data
    pub advance: usize,
    /// Length of the record at the start of the buffered data
    pub len: usize,
}

impl Token {
    /// A token that consumes its whole length with no separator
    pub fn whole(len: usize) -> Self {
        Self { advance: len, len }
    }
}

/// Finds the next record boundary in buffered stream data
pub trait Tokenizer {
    /// Look for a record at the start of `data`
    ///
    /// Return `Ok(None)` to request more input. With `at_eof` set no more
    /// input will arrive, and any non-empty `data` must be returned as a
    /// token or it is dropped.
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Token>>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Token>> {
        (**self).split(data, at_eof)
    }
}

/// Splits on a single `\n`; the newline is consumed but not returned
#[derive(Debug, Clone, Copy, Default)]
pub struct NewlineTokenizer;

impl Tokenizer for NewlineTokenizer {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Token>> {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return Ok(Some(Token {
                advance: pos + 1,
                len: pos,
            }));
        }
        Ok(remainder(data, at_eof))
    }
}

/// Splits on the first match of a regular expression
///
/// Empty matches never split, which keeps patterns such as `\n*` from
/// stalling the stream.
#[derive(Debug, Clone)]
pub struct PatternTokenizer {
    pattern: Regex,
}

impl PatternTokenizer {
    /// Create a tokenizer from a compiled pattern
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// The separator pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl Tokenizer for PatternTokenizer {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Token>> {
        if let Some(m) = self.pattern.find_iter(data).find(|m| !m.is_empty()) {
            return Ok(Some(Token {
                advance: m.end(),
                len: m.start(),
            }));
        }
        Ok(remainder(data, at_eof))
    }
}

/// Holds everything until end of stream and returns it as one token
#[derive(Debug, Clone, Copy, Default)]
pub struct RemainderTokenizer;

impl Tokenizer for RemainderTokenizer {
    fn split(&mut self, data: &[u8], at_eof: bool) -> Result<Option<Token>> {
        Ok(remainder(data, at_eof))
    }
}

/// The remaining data as a final token, once the stream is exhausted
fn remainder(data: &[u8], at_eof: bool) -> Option<Token> {
    (at_eof && !data.is_empty()).then(|| Token::whole(data.len()))
}

/// Tokenization policy chosen at construction time
#[derive(Debug, Clone)]
pub enum Separator {
    /// Fixed `\n`
    Newline,
    /// First match of a regular expression
    Pattern(Regex),
    /// No separator; the whole stream is one record
    Remainder,
}

impl Separator {
    /// Build the matching tokenizer
    pub fn tokenizer(&self) -> Box<dyn Tokenizer + Send> {
        match self {
            Separator::Newline => Box::new(NewlineTokenizer),
            Separator::Pattern(pattern) => Box::new(PatternTokenizer::new(pattern.clone())),
            Separator::Remainder => Box::new(RemainderTokenizer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_tokenizer() {
        let mut t = NewlineTokenizer;
        assert_eq!(
            t.split(b"ab\ncd", false).unwrap(),
            Some(Token { advance: 3, len: 2 })
        );
        assert_eq!(t.split(b"cd", false).unwrap(), None);
        assert_eq!(t.split(b"cd", true).unwrap(), Some(Token::whole(2)));
        assert_eq!(t.split(b"", true).unwrap(), None);
    }

    #[test]
    fn test_pattern_tokenizer() {
        let mut t = PatternTokenizer::new(Regex::new(r"\r?\n").unwrap());
        assert_eq!(
            t.split(b"ab\r\ncd", false).unwrap(),
            Some(Token { advance: 4, len: 2 })
        );
        assert_eq!(t.split(b"ab\r", false).unwrap(), None);
        assert_eq!(t.split(b"ab\r", true).unwrap(), Some(Token::whole(3)));
    }

    #[test]
    fn test_pattern_tokenizer_skips_empty_matches() {
        let mut t = PatternTokenizer::new(Regex::new(r"\|*").unwrap());
        assert_eq!(
            t.split(b"ab||cd", false).unwrap(),
            Some(Token { advance: 4, len: 2 })
        );
        assert_eq!(t.split(b"abcd", false).unwrap(), None);
    }

    #[test]
    fn test_remainder_tokenizer() {
        let mut t = RemainderTokenizer;
        assert_eq!(t.split(b"abc", false).unwrap(), None);
        assert_eq!(t.split(b"abc", true).unwrap(), Some(Token::whole(3)));
        assert_eq!(t.split(b"", true).unwrap(), None);
    }

    #[test]
    fn test_separator_selects_tokenizer() {
        let mut t = Separator::Pattern(Regex::new(",").unwrap()).tokenizer();
        assert_eq!(
            t.split(b"a,b", false).unwrap(),
            Some(Token { advance: 2, len: 1 })
        );
        let mut t = Separator::Remainder.tokenizer();
        assert_eq!(t.split(b"a,b", false).unwrap(), None);
    }
}
