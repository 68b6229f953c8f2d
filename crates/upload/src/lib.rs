//! Conversion helpers for uploaded files
//!
//! This crate provides two small, synchronous transformations that sit inside an
//! HTTP upload pipeline:
//!
//! - [`form::FormEncoder`]: packages an uploaded file, plus a `created-by` field,
//!   into a `multipart/form-data` body ready to be forwarded to another service
//! - [`form::TableDecoder`]: parses an uploaded CSV file into an in-memory table
//!   of strings
//!
//! # Example
//!
//! ```
//! use micro_upload::file::MemoryFile;
//! use micro_upload::form;
//!
//! let upload = MemoryFile::new("report.csv", "id,name\n1,Alice\n");
//!
//! let encoded = form::encode(&upload, "report.csv", "z1234567").unwrap();
//! assert!(encoded.content_type().starts_with("multipart/form-data; boundary="));
//!
//! let table = form::decode(&upload, false).unwrap();
//! assert_eq!(table.rows(), &[vec!["1".to_string(), "Alice".to_string()]]);
//! ```
//!
//! # Architecture
//!
//! - [`file`]: the [`file::FormFile`] capability used as input by both components
//! - [`codec`]: the wire formats
//!   - [`codec::multipart`]: multipart/form-data encoding on `tokio_util::codec`
//!   - [`codec::csv`]: RFC 4180 record reading on the `csv` crate
//! - [`form`]: the high level encode/decode operations and their errors
//!
//! # Resource handling
//!
//! Every operation opens its input exactly once and owns the opened stream for the
//! duration of the call; the stream is dropped on every return path. No state is
//! shared between calls, so encoders and decoders may be used from any number of
//! threads at once.

pub mod codec;
pub mod file;
pub mod form;

mod utils;
pub(crate) use utils::ensure;

#[cfg(test)]
mod testing;
