//! CSV record decoding
//!
//! # Components
//!
//! - [`CsvOptions`]: dialect (delimiter, comment byte, leading space trimming) and
//!   the [`FieldCount`] policy
//! - [`RecordReader`]: blocking reader yielding one [`Record`] per call, built on
//!   a [`csv::Reader`]
//! - `StrictReader`: the byte filter in front of the `csv` tokenizer enforcing
//!   RFC 4180 quoting and trimming leading whitespace

mod options;
mod record_reader;
mod strict_reader;

pub use options::{CsvOptions, FieldCount};
pub(crate) use record_reader::DEFAULT_CHUNK_SIZE;
pub use record_reader::{Record, RecordReader};
