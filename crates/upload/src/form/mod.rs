//! Encode and decode operations on uploaded files
//!
//! - [`encode`] / [`FormEncoder`]: file plus `created-by` field to a multipart body
//! - [`decode`] / [`TableDecoder`]: CSV file to a [`Table`]
//!
//! Both open the [`FormFile`](crate::file::FormFile) they are given exactly once,
//! fail on the first error without returning partial output, and keep no state
//! between calls.

mod error;
mod form_encoder;
mod table;
mod table_decoder;

pub use crate::codec::multipart::EncodedForm;
pub use error::{DecodeError, EncodeError, UploadError};
pub use form_encoder::{CREATED_BY_FIELD, FormEncoder, encode};
pub use table::Table;
pub use table_decoder::{TableDecoder, decode};
