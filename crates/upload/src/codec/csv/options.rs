use crate::codec::ParseError;
use crate::ensure;

/// How many fields each record must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldCount {
    /// Records may have any number of fields
    #[default]
    Flexible,
    /// Every record must have as many fields as the first one read
    FromFirst,
    /// Every record must have exactly this many fields
    Exact(usize),
}

/// Dialect and validation settings for CSV decoding.
///
/// The defaults read RFC 4180 CSV with `,` as delimiter, no comment lines,
/// leading whitespace trimmed from every field and no field count check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    delimiter: u8,
    comment: Option<u8>,
    trim_leading_space: bool,
    field_count: FieldCount,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',', comment: None, trim_leading_space: true, field_count: FieldCount::Flexible }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Lines starting with `comment` are skipped.
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_trim_leading_space(mut self, trim_leading_space: bool) -> Self {
        self.trim_leading_space = trim_leading_space;
        self
    }

    pub fn with_field_count(mut self, field_count: FieldCount) -> Self {
        self.field_count = field_count;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn comment(&self) -> Option<u8> {
        self.comment
    }

    pub fn trim_leading_space(&self) -> bool {
        self.trim_leading_space
    }

    pub fn field_count(&self) -> FieldCount {
        self.field_count
    }

    /// Checks the delimiter and comment bytes can be told apart from the rest of the input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidOptions`] if either byte is a quote, CR, LF or
    /// non-ASCII, or if they are equal.
    pub fn validate(&self) -> Result<(), ParseError> {
        ensure!(is_valid_marker(self.delimiter), ParseError::invalid_options(format!("invalid delimiter {:?}", char::from(self.delimiter))));

        if let Some(comment) = self.comment {
            ensure!(is_valid_marker(comment), ParseError::invalid_options(format!("invalid comment {:?}", char::from(comment))));
            ensure!(comment != self.delimiter, ParseError::invalid_options("comment and delimiter are the same"));
        }

        Ok(())
    }
}

fn is_valid_marker(b: u8) -> bool {
    b.is_ascii() && !matches!(b, b'"' | b'\r' | b'\n')
}
