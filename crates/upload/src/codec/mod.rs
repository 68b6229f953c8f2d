//! Codecs for multipart bodies and CSV records
//!
//! - [`multipart::MultipartEncoder`]: an [`Encoder`](tokio_util::codec::Encoder) of
//!   [`multipart::PartItem`]s producing a `multipart/form-data` body into a
//!   [`bytes::BytesMut`]
//! - [`csv::RecordReader`]: a blocking reader over the `csv` crate producing one
//!   CSV record at a time from a [`std::io::Read`]
//!
//! [`multipart::FormWriter`] pairs the multipart encoder with a buffer and a
//! [`std::io::Write`] surface.

pub mod csv;
mod error;
pub mod multipart;

pub use error::{MultipartError, ParseError};
