//! Blocking writer building a whole `multipart/form-data` body in memory.
//!
//! [`FormWriter`] owns a [`MultipartEncoder`] and the output buffer. Each call to
//! [`FormWriter::create_part`] (or one of its shorthands) closes the previous part
//! and hands back a [`PartWriter`], an [`io::Write`] for the new part's content.
//! [`FormWriter::finish`] appends the closing delimiter and yields an
//! [`EncodedForm`].

use std::io;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::MultipartError;
use crate::codec::multipart::{Boundary, MultipartEncoder, PartHeader, PartItem};

/// Initial capacity of the body buffer
const INIT_BODY_SIZE: usize = 8 * 1024;

#[derive(Debug)]
pub struct FormWriter {
    encoder: MultipartEncoder,
    buf: BytesMut,
}

impl FormWriter {
    /// Creates a writer with a fresh random boundary.
    pub fn new() -> Self {
        Self::with_boundary(Boundary::random())
    }

    pub fn with_boundary(boundary: Boundary) -> Self {
        Self { encoder: MultipartEncoder::new(boundary), buf: BytesMut::with_capacity(INIT_BODY_SIZE) }
    }

    pub fn boundary(&self) -> &Boundary {
        self.encoder.boundary()
    }

    /// The Content-Type header value for the body being written.
    pub fn content_type(&self) -> String {
        self.encoder.boundary().content_type()
    }

    /// Number of body bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Starts a new part with the given header.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::Finished`] if the body is already closed.
    pub fn create_part(&mut self, header: PartHeader) -> Result<PartWriter<'_>, MultipartError> {
        self.encoder.encode(PartItem::<Bytes>::Header(header), &mut self.buf)?;
        Ok(PartWriter { form: self })
    }

    /// Starts a file part named `field_name` with the given `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidHeader`] if either name is malformed.
    pub fn create_form_file(&mut self, field_name: &str, file_name: &str) -> Result<PartWriter<'_>, MultipartError> {
        self.create_part(PartHeader::form_file(field_name, file_name)?)
    }

    /// Starts a text field part named `field_name`.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidHeader`] if the name is malformed.
    pub fn create_form_field(&mut self, field_name: &str) -> Result<PartWriter<'_>, MultipartError> {
        self.create_part(PartHeader::form_field(field_name)?)
    }

    /// Writes a complete text field part.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidHeader`] if the name is malformed.
    pub fn write_field(&mut self, field_name: &str, value: &str) -> Result<(), MultipartError> {
        let mut part = self.create_form_field(field_name)?;
        part.write_str(value)
    }

    /// Closes the body and returns it together with its Content-Type.
    pub fn finish(mut self) -> EncodedForm {
        self.encoder.encode_eof(&mut self.buf);
        EncodedForm { content_type: self.encoder.boundary().content_type(), body: self.buf.freeze() }
    }
}

impl Default for FormWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer for the content of the part most recently created on a [`FormWriter`].
#[derive(Debug)]
pub struct PartWriter<'a> {
    form: &'a mut FormWriter,
}

impl PartWriter<'_> {
    /// Writes `value` verbatim into the part.
    ///
    /// # Errors
    ///
    /// Propagates encoder errors, which cannot occur while the part is open.
    pub fn write_str(&mut self, value: &str) -> Result<(), MultipartError> {
        self.form.encoder.encode(PartItem::Chunk(value.as_bytes()), &mut self.form.buf)
    }
}

impl io::Write for PartWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.form.encoder.encode(PartItem::Chunk(buf), &mut self.form.buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A finished `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    content_type: String,
    body: Bytes,
}

impl EncodedForm {
    /// The Content-Type header value, `multipart/form-data; boundary=...`.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (String, Bytes) {
        (self.content_type, self.body)
    }
}
