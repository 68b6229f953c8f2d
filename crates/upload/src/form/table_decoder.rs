//! Parsing an uploaded CSV file into a [`Table`]

use tracing::{debug, trace};

use crate::codec::ParseError;
use crate::codec::csv::{CsvOptions, DEFAULT_CHUNK_SIZE, RecordReader};
use crate::file::FormFile;
use crate::form::{DecodeError, Table};

#[derive(Debug, Clone)]
pub struct TableDecoder {
    options: CsvOptions,
    chunk_size: usize,
}

impl Default for TableDecoder {
    fn default() -> Self {
        Self { options: CsvOptions::default(), chunk_size: DEFAULT_CHUNK_SIZE }
    }
}

impl TableDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder for a specific CSV dialect.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidOptions`] if the options do not validate.
    pub fn with_options(options: CsvOptions) -> Result<Self, ParseError> {
        options.validate()?;
        Ok(Self { options, chunk_size: DEFAULT_CHUNK_SIZE })
    }

    /// Sets how many bytes are read from the file at a time.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Decodes every record of `file`.
    ///
    /// With `include_header` unset the first record is read and dropped. The file
    /// is opened once and its stream is released before returning, whether
    /// decoding succeeds or not.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Open`] if `file` cannot be opened
    /// - [`DecodeError::HeaderParse`] if the header to drop cannot be read,
    ///   including when the file is empty
    /// - [`DecodeError::BodyParse`] if any later record cannot be read
    pub fn decode<F: FormFile>(&self, file: &F, include_header: bool) -> Result<Table, DecodeError> {
        let file_name = file.file_name();
        let source = file.open().map_err(|e| DecodeError::open(file_name, e))?;
        let mut records = RecordReader::with_chunk_size(source, self.options, self.chunk_size)
            .map_err(|e| DecodeError::header_parse(file_name, e))?;

        if !include_header {
            let header = records
                .read_record()
                .and_then(|header| header.ok_or(ParseError::UnexpectedEof))
                .map_err(|e| DecodeError::header_parse(file_name, e))?;
            trace!(file_name, fields = header.len(), "skipped csv header");
        }

        let rows = records.collect::<Result<Vec<_>, _>>().map_err(|e| DecodeError::body_parse(file_name, e))?;

        debug!(file_name, rows = rows.len(), include_header, "decoded csv table");
        Ok(Table::new(rows))
    }
}

/// Decodes `file` with the default [`TableDecoder`].
///
/// # Errors
///
/// See [`TableDecoder::decode`].
pub fn decode<F: FormFile>(file: &F, include_header: bool) -> Result<Table, DecodeError> {
    TableDecoder::default().decode(file, include_header)
}
