//! `multipart/form-data` encoding
//!
//! # Components
//!
//! - [`Boundary`]: validated or randomly generated delimiter token
//! - [`PartHeader`]: the headers of one form part
//! - [`MultipartEncoder`]: an [`Encoder`](tokio_util::codec::Encoder) of [`PartItem`]s
//! - [`FormWriter`]: blocking, in-memory driver producing an [`EncodedForm`]

mod boundary;
mod form_writer;
mod multipart_encoder;
mod part_header;

pub use boundary::Boundary;
pub use form_writer::{EncodedForm, FormWriter, PartWriter};
pub use multipart_encoder::{MultipartEncoder, PartItem};
pub use part_header::PartHeader;
