//! Encoder for `multipart/form-data` bodies.
//!
//! Produces the wire format described in
//! [RFC 7578](https://tools.ietf.org/html/rfc7578) and
//! [RFC 2046 Section 5.1](https://tools.ietf.org/html/rfc2046#section-5.1):
//!
//! ```text
//! --boundary\r\n
//! Content-Disposition: form-data; name="a"\r\n
//! \r\n
//! <content of a>\r\n
//! --boundary\r\n
//! ...
//! <content of the last part>\r\n
//! --boundary--\r\n
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

use crate::codec::MultipartError;
use crate::codec::multipart::{Boundary, PartHeader};

/// Initial space reserved for a part's delimiter and headers
const INIT_PART_HEADER_SIZE: usize = 256;

/// An item of a multipart body stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartItem<Data: Buf = Bytes> {
    /// Starts a new part, closing the previous one if any
    Header(PartHeader),
    /// Content of the current part
    Chunk(Data),
    /// Closes the body with the final delimiter
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// nothing written yet
    Initial,
    /// a part header has been written, content may follow
    InPart,
    /// the final delimiter has been written
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartEncoder {
    boundary: Boundary,
    state: State,
}

impl MultipartEncoder {
    pub fn new(boundary: Boundary) -> Self {
        Self { boundary, state: State::Initial }
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn is_finish(&self) -> bool {
        self.state == State::Finished
    }

    /// Writes the closing delimiter. Encoding more than once is a no-op.
    pub fn encode_eof(&mut self, dst: &mut BytesMut) {
        match self.state {
            State::Finished => {
                warn!("encode multipart eof but body is already finished");
                return;
            }
            State::InPart => dst.put_slice(b"\r\n"),
            State::Initial => {}
        }

        dst.reserve(self.boundary.as_str().len() + 6);
        dst.put_slice(b"--");
        dst.put_slice(self.boundary.as_str().as_bytes());
        dst.put_slice(b"--\r\n");
        self.state = State::Finished;
    }

    fn encode_header(&mut self, header: &PartHeader, dst: &mut BytesMut) -> Result<(), MultipartError> {
        match self.state {
            State::Finished => return Err(MultipartError::Finished),
            State::InPart => dst.put_slice(b"\r\n"),
            State::Initial => {}
        }

        dst.reserve(INIT_PART_HEADER_SIZE);
        dst.put_slice(b"--");
        dst.put_slice(self.boundary.as_str().as_bytes());
        dst.put_slice(b"\r\n");

        for (header_name, header_value) in header.headers() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");

        self.state = State::InPart;
        Ok(())
    }
}

impl<D: Buf> Encoder<PartItem<D>> for MultipartEncoder {
    type Error = MultipartError;

    fn encode(&mut self, item: PartItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            PartItem::Header(header) => self.encode_header(&header, dst),
            PartItem::Chunk(mut bytes) => match self.state {
                State::Initial => Err(MultipartError::NoPart),
                State::Finished => Err(MultipartError::Finished),
                State::InPart => {
                    dst.reserve(bytes.remaining());
                    while bytes.has_remaining() {
                        let chunk = bytes.chunk();
                        let len = chunk.len();
                        dst.put_slice(chunk);
                        bytes.advance(len);
                    }
                    Ok(())
                }
            },
            PartItem::Eof => {
                self.encode_eof(dst);
                Ok(())
            }
        }
    }
}
