//! Strict quoting and leading space trimming in front of a [`csv::Reader`].
//!
//! The `csv` tokenizer is lenient: it reads a `"` inside an unquoted field as data,
//! accepts anything after a closing quote and closes a quoted field left open at
//! end of input. [`StrictReader`] walks the raw bytes once, tracking the same
//! field states as the tokenizer, and fails the read instead:
//!
//! - a `"` inside an unquoted field is a [`ParseError::BareQuote`]
//! - anything other than a delimiter, a line break or a second `"` after a
//!   closing quote is a [`ParseError::ExtraneousQuote`]
//! - end of input inside a quoted field is a [`ParseError::UnterminatedQuote`]
//!
//! With trimming enabled, ASCII whitespace at the start of a field is dropped
//! before the tokenizer sees it, so ` "a, b"` still reads as a quoted field. As
//! with Go's `TrimLeadingSpace`, this holds even when the delimiter itself is
//! whitespace.
//!
//! Errors travel through the tokenizer as [`io::Error`]s wrapping the
//! [`ParseError`], and are unwrapped again by `From<io::Error> for ParseError`.
//! Bytes preceding an error are handed out first, so records completed before
//! the offending byte are still read.

use std::io;
use std::io::{ErrorKind, Read};

use crate::codec::ParseError;
use crate::codec::csv::CsvOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// start of a line outside quotes, where a comment may begin
    RecordStart,
    FieldStart,
    Unquoted,
    Quoted,
    /// a `"` seen inside a quoted field, either closing it or escaping the next `"`
    QuoteInQuoted,
    Comment,
}

#[derive(Debug)]
pub(crate) struct StrictReader<R> {
    inner: R,
    delimiter: u8,
    comment: Option<u8>,
    trim_leading_space: bool,
    state: State,
    line: u64,
    column: u64,
    record_line: u64,
    pending: Option<ParseError>,
}

impl<R: Read> StrictReader<R> {
    pub(crate) fn new(inner: R, options: &CsvOptions) -> Self {
        Self {
            inner,
            delimiter: options.delimiter(),
            comment: options.comment(),
            trim_leading_space: options.trim_leading_space(),
            state: State::RecordStart,
            line: 1,
            column: 0,
            record_line: 1,
            pending: None,
        }
    }

    /// Checks `buf` in place, dropping trimmed bytes. Returns how many bytes were
    /// kept; on error the bytes before the offending one are kept and the error is
    /// stored for the next read.
    fn filter(&mut self, buf: &mut [u8]) -> usize {
        let mut kept = 0;
        for i in 0..buf.len() {
            let b = buf[i];
            self.column += 1;

            match self.step(b) {
                Ok(true) => {
                    buf[kept] = b;
                    kept += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    self.pending = Some(e);
                    return kept;
                }
            }

            if b == b'\n' {
                self.line += 1;
                self.column = 0;
            }
        }
        kept
    }

    /// Advances the state over `b`; `Ok(false)` if `b` is trimmed.
    fn step(&mut self, b: u8) -> Result<bool, ParseError> {
        self.state = match self.state {
            State::Comment if b == b'\n' => State::RecordStart,
            State::Comment => State::Comment,
            State::RecordStart if Some(b) == self.comment => State::Comment,
            State::RecordStart | State::FieldStart => {
                if self.state == State::RecordStart && !is_line_break(b) {
                    self.record_line = self.line;
                }
                match b {
                    b'\r' | b'\n' => State::RecordStart,
                    b if self.trim_leading_space && is_space(b) => return Ok(false),
                    b if b == self.delimiter => State::FieldStart,
                    b'"' => State::Quoted,
                    _ => State::Unquoted,
                }
            }
            State::Unquoted => match b {
                b'\r' | b'\n' => State::RecordStart,
                b if b == self.delimiter => State::FieldStart,
                b'"' => return Err(ParseError::bare_quote(self.line, self.column)),
                _ => State::Unquoted,
            },
            State::Quoted if b == b'"' => State::QuoteInQuoted,
            State::Quoted => State::Quoted,
            State::QuoteInQuoted => match b {
                b'"' => State::Quoted,
                b'\r' | b'\n' => State::RecordStart,
                b if b == self.delimiter => State::FieldStart,
                _ => return Err(ParseError::extraneous_quote(self.line, self.column)),
            },
        };
        Ok(true)
    }
}

impl<R: Read> Read for StrictReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if let Some(error) = self.pending.take() {
                return Err(io::Error::new(ErrorKind::InvalidData, error));
            }

            let read = match self.inner.read(buf) {
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if read == 0 {
                if self.state == State::Quoted {
                    self.pending = Some(ParseError::unterminated_quote(self.record_line));
                    continue;
                }
                return Ok(0);
            }

            let kept = self.filter(&mut buf[..read]);
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

fn is_line_break(b: u8) -> bool {
    matches!(b, b'\r' | b'\n')
}

/// Whitespace other than line breaks, as classified by Go's `unicode.IsSpace` for ASCII
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0B | 0x0C)
}
