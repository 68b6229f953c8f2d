use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MultipartError {
    #[error("invalid boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("invalid part header: {reason}")]
    InvalidHeader { reason: String },

    #[error("part content written before any part header")]
    NoPart,

    #[error("multipart body is already finished")]
    Finished,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl MultipartError {
    pub fn invalid_boundary<S: ToString>(str: S) -> Self {
        Self::InvalidBoundary { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }
}

/// Errors raised while decoding CSV records.
///
/// Lines and columns are 1-based; columns count bytes within the line.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("record on line {line}: bare \" in non-quoted field at column {column}")]
    BareQuote { line: u64, column: u64 },

    #[error("record on line {line}: extraneous or missing \" in quoted field at column {column}")]
    ExtraneousQuote { line: u64, column: u64 },

    #[error("record on line {line}: quoted field is not terminated before end of input")]
    UnterminatedQuote { line: u64 },

    #[error("record on line {line}: wrong number of fields, expected {expected} but found {found}")]
    FieldCount { line: u64, expected: usize, found: usize },

    #[error("record on line {line}: field is not valid utf-8: {source}")]
    InvalidUtf8 { line: u64, source: csv::Utf8Error },

    #[error("unexpected end of input, no record to read")]
    UnexpectedEof,

    #[error("invalid csv options: {reason}")]
    InvalidOptions { reason: String },

    #[error("io error: {source}")]
    Io { source: io::Error },

    #[error("csv error: {reason}")]
    Csv { reason: String },
}

impl ParseError {
    pub fn bare_quote(line: u64, column: u64) -> Self {
        Self::BareQuote { line, column }
    }

    pub fn extraneous_quote(line: u64, column: u64) -> Self {
        Self::ExtraneousQuote { line, column }
    }

    pub fn unterminated_quote(line: u64) -> Self {
        Self::UnterminatedQuote { line }
    }

    pub fn field_count(line: u64, expected: usize, found: usize) -> Self {
        Self::FieldCount { line, expected, found }
    }

    pub fn invalid_utf8(line: u64, source: csv::Utf8Error) -> Self {
        Self::InvalidUtf8 { line, source }
    }

    pub fn invalid_options<S: ToString>(str: S) -> Self {
        Self::InvalidOptions { reason: str.to_string() }
    }

    /// The line of the record the error was raised on, if it relates to one.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::BareQuote { line, .. }
            | Self::ExtraneousQuote { line, .. }
            | Self::UnterminatedQuote { line }
            | Self::FieldCount { line, .. }
            | Self::InvalidUtf8 { line, .. } => Some(*line),
            Self::UnexpectedEof | Self::InvalidOptions { .. } | Self::Io { .. } | Self::Csv { .. } => None,
        }
    }
}

/// Unwraps a [`ParseError`] carried inside an [`io::Error`], keeping any other
/// error as [`ParseError::Io`].
impl From<io::Error> for ParseError {
    fn from(error: io::Error) -> Self {
        error.downcast::<ParseError>().unwrap_or_else(|source| Self::Io { source })
    }
}

impl From<csv::Error> for ParseError {
    fn from(error: csv::Error) -> Self {
        let line = |pos: Option<csv::Position>| pos.map_or(0, |pos| pos.line());

        match error.into_kind() {
            csv::ErrorKind::Io(source) => Self::from(source),
            csv::ErrorKind::Utf8 { pos, err } => Self::invalid_utf8(line(pos), err),
            csv::ErrorKind::UnequalLengths { pos, expected_len, len } => {
                Self::field_count(line(pos), to_usize(expected_len), to_usize(len))
            }
            kind => Self::Csv { reason: format!("{kind:?}") },
        }
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
