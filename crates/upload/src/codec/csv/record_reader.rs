use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::trace;

use crate::codec::ParseError;
use crate::codec::csv::strict_reader::StrictReader;
use crate::codec::csv::{CsvOptions, FieldCount};
use crate::ensure;

/// Default number of bytes requested from the reader at a time
pub(crate) const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// One decoded CSV record, fields in source order.
pub type Record = Vec<String>;

/// Blocking reader pulling CSV records out of a [`Read`] stream.
///
/// Tokenizing is done by a [`csv::Reader`] behind a `StrictReader`, which
/// rejects malformed quoting and trims leading whitespace. The reader is also an
/// [`Iterator`], which stops after the first error.
#[derive(Debug)]
pub struct RecordReader<R> {
    reader: csv::Reader<StrictReader<R>>,
    record: StringRecord,
    field_count: FieldCount,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    /// Creates a reader for the given dialect.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidOptions`] if the options do not validate.
    pub fn new(reader: R, options: CsvOptions) -> Result<Self, ParseError> {
        Self::with_chunk_size(reader, options, DEFAULT_CHUNK_SIZE)
    }

    /// Like [`RecordReader::new`], reading `chunk_size` bytes at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidOptions`] if the options do not validate.
    pub fn with_chunk_size(reader: R, options: CsvOptions, chunk_size: usize) -> Result<Self, ParseError> {
        options.validate()?;

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(options.field_count() != FieldCount::FromFirst)
            .delimiter(options.delimiter())
            .comment(options.comment())
            .trim(Trim::None)
            .buffer_capacity(chunk_size.max(1))
            .from_reader(StrictReader::new(reader, &options));

        Ok(Self { reader, record: StringRecord::new(), field_count: options.field_count(), done: false })
    }

    /// Reads the next record, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the underlying reader fails, or the error
    /// describing why the record is malformed.
    pub fn read_record(&mut self) -> Result<Option<Record>, ParseError> {
        if !self.reader.read_record(&mut self.record)? {
            trace!(line = self.reader.position().line(), "reached end of csv input");
            return Ok(None);
        }

        let line = self.record.position().map_or(0, csv::Position::line);
        if let FieldCount::Exact(expected) = self.field_count {
            ensure!(self.record.len() == expected, ParseError::field_count(line, expected, self.record.len()));
        }

        let record = self.record.iter().map(str::to_owned).collect::<Record>();
        trace!(line, fields = record.len(), "decoded csv record");
        Ok(Some(record))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let next = self.read_record().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}
