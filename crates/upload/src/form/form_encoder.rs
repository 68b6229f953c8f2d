//! Packaging an uploaded file as a `multipart/form-data` body
//!
//! The produced body holds exactly two parts:
//!
//! 1. a file part whose field name and filename are both the given file name,
//!    carrying the file's bytes unchanged
//! 2. a text part named `created-by` carrying the uploader's identifier
//!
//! A fresh random boundary is drawn for every body.

use std::io;
use std::io::Write;

use tracing::{debug, trace};

use crate::codec::multipart::{EncodedForm, FormWriter};
use crate::file::FormFile;
use crate::form::EncodeError;

/// Field name of the part carrying the uploader's identifier
pub const CREATED_BY_FIELD: &str = "created-by";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEncoder {
    created_by_field: String,
}

impl Default for FormEncoder {
    fn default() -> Self {
        Self { created_by_field: CREATED_BY_FIELD.to_owned() }
    }
}

impl FormEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the name of the field carrying the `created_by` value.
    pub fn with_field_name(mut self, created_by_field: impl Into<String>) -> Self {
        self.created_by_field = created_by_field.into();
        self
    }

    pub fn field_name(&self) -> &str {
        &self.created_by_field
    }

    /// Encodes `file` and `created_by` into a multipart body.
    ///
    /// The file is opened once and its stream is released before returning,
    /// whether encoding succeeds or not.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::Open`] if `file` cannot be opened
    /// - [`EncodeError::PartCreation`] if `file_name` or the field name contains
    ///   characters not allowed in a header value, such as CR or LF; empty names
    ///   are accepted
    /// - [`EncodeError::Copy`] if reading `file` fails partway
    pub fn encode<F: FormFile>(&self, file: &F, file_name: &str, created_by: &str) -> Result<EncodedForm, EncodeError> {
        let mut form = FormWriter::new();

        {
            let mut source = file.open().map_err(|e| EncodeError::open(file_name, e))?;

            let mut part = form
                .create_form_file(file_name, file_name)
                .map_err(|e| EncodeError::part_creation(file_name, file_name, e))?;

            let copied = io::copy(&mut source, &mut part).map_err(|e| EncodeError::copy(file_name, e))?;
            trace!(file_name, bytes = copied, "copied file into multipart part");
        }

        {
            let mut part = form
                .create_form_field(&self.created_by_field)
                .map_err(|e| EncodeError::part_creation(file_name, &self.created_by_field, e))?;

            part.write_all(created_by.as_bytes()).map_err(|e| EncodeError::copy(file_name, e))?;
        }

        let encoded = form.finish();
        debug!(file_name, content_type = encoded.content_type(), body_size = encoded.body().len(), "encoded multipart form");
        Ok(encoded)
    }
}

/// Encodes `file` with the default [`FormEncoder`].
///
/// # Errors
///
/// See [`FormEncoder::encode`].
pub fn encode<F: FormFile>(file: &F, file_name: &str, created_by: &str) -> Result<EncodedForm, EncodeError> {
    FormEncoder::default().encode(file, file_name, created_by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MultipartError;
    use crate::file::MemoryFile;
    use crate::testing::{Part, TrackedFile, init_tracing, parse_multipart};
    use bytes::Bytes;
    use bytes::buf::Reader;
    use bytes::Buf;
    use std::io::Read;

    #[test]
    fn test_body_layout() {
        let file = MemoryFile::new("report.csv", "id,name\n1,Alice\n");
        let encoded = encode(&file, "report.csv", "z1234567").unwrap();

        let boundary = encoded.content_type().strip_prefix("multipart/form-data; boundary=").unwrap();
        let expected = format!(
            "--{boundary}\r\n\
             content-disposition: form-data; name=\"report.csv\"; filename=\"report.csv\"\r\n\
             content-type: application/octet-stream\r\n\
             \r\n\
             id,name\n1,Alice\n\r\n\
             --{boundary}\r\n\
             content-disposition: form-data; name=\"created-by\"\r\n\
             \r\n\
             z1234567\r\n\
             --{boundary}--\r\n"
        );

        assert_eq!(std::str::from_utf8(encoded.body()).unwrap(), expected);
    }

    #[test]
    fn test_custom_field_name() {
        let file = MemoryFile::new("a.txt", "a");
        let encoded = FormEncoder::new().with_field_name("uploaded-by").encode(&file, "a.txt", "me").unwrap();

        let body = std::str::from_utf8(encoded.body()).unwrap();
        assert!(body.contains("content-disposition: form-data; name=\"uploaded-by\"\r\n\r\nme\r\n"));
    }

    #[test]
    fn test_malformed_file_name() {
        let file = MemoryFile::new("x", "data");
        let error = encode(&file, "bad\r\nname", "me").unwrap_err();

        assert!(matches!(
            error,
            EncodeError::PartCreation { ref part_name, source: MultipartError::InvalidHeader { .. }, .. } if part_name == "bad\r\nname"
        ));
    }

    #[test]
    fn test_malformed_field_name() {
        let file = MemoryFile::new("x", "data");
        let error = FormEncoder::new().with_field_name("created\nby").encode(&file, "x", "me").unwrap_err();

        assert!(matches!(error, EncodeError::PartCreation { ref file_name, .. } if file_name == "x"));
    }

    #[test]
    fn test_empty_file_name() {
        let file = MemoryFile::new("", "data");
        let encoded = encode(&file, "", "me").unwrap();

        let parts = parse_multipart(encoded.content_type(), encoded.body());
        assert_eq!(parts[0].name, "");
        assert_eq!(parts[0].file_name.as_deref(), Some(""));
        assert_eq!(parts[0].content, b"data");
    }

    struct Unopenable;

    impl FormFile for Unopenable {
        type Stream = Reader<Bytes>;

        fn file_name(&self) -> &str {
            "locked.bin"
        }

        fn open(&self) -> io::Result<Self::Stream> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
        }
    }

    #[test]
    fn test_open_error() {
        let error = encode(&Unopenable, "locked.bin", "me").unwrap_err();
        assert!(matches!(error, EncodeError::Open { ref source, .. } if source.kind() == io::ErrorKind::PermissionDenied));
        assert_eq!(error.file_name(), "locked.bin");
    }

    struct Truncated;

    impl FormFile for Truncated {
        type Stream = io::Chain<Reader<Bytes>, BrokenPipe>;

        fn file_name(&self) -> &str {
            "truncated.bin"
        }

        fn open(&self) -> io::Result<Self::Stream> {
            Ok(Bytes::from_static(b"partial").reader().chain(BrokenPipe))
        }
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_copy_error() {
        let error = encode(&Truncated, "truncated.bin", "me").unwrap_err();
        assert!(matches!(error, EncodeError::Copy { ref source, .. } if source.kind() == io::ErrorKind::BrokenPipe));
    }

    fn binary_content(len: usize) -> Vec<u8> {
        // xorshift, seeded so failures reproduce
        let mut state = 0x2545_F491_4F6C_DD1D_u64;
        let mut content = Vec::with_capacity(len);
        while content.len() < len {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            content.extend_from_slice(&state.to_le_bytes());
        }
        content.truncate(len);
        content
    }

    #[test]
    fn test_scenario_report() {
        init_tracing();
        let file = TrackedFile::new("report.csv", "id,name\n1,Alice\n");
        let encoded = encode(&file, "report.csv", "z1234567").unwrap();

        let token = encoded.content_type().strip_prefix("multipart/form-data; boundary=").unwrap();
        assert!(!token.is_empty());

        let parts = parse_multipart(encoded.content_type(), encoded.body());
        assert_eq!(
            parts,
            vec![
                Part {
                    name: "report.csv".to_string(),
                    file_name: Some("report.csv".to_string()),
                    content_type: Some("application/octet-stream".to_string()),
                    content: b"id,name\n1,Alice\n".to_vec(),
                },
                Part {
                    name: "created-by".to_string(),
                    file_name: None,
                    content_type: None,
                    content: b"z1234567".to_vec(),
                },
            ]
        );
    }

    #[test]
    fn test_round_trip_sizes() {
        for len in [0, 1, 2, 4 * 1024 + 3, 64 * 1024, 2 * 1024 * 1024 + 17] {
            let content = binary_content(len);
            let file = MemoryFile::new("blob.bin", content.clone());
            let encoded = encode(&file, "blob.bin", "z7654321").unwrap();

            let parts = parse_multipart(encoded.content_type(), encoded.body());
            assert_eq!(parts.len(), 2, "len {len}");
            assert_eq!(parts[0].name, "blob.bin");
            assert_eq!(parts[0].file_name.as_deref(), Some("blob.bin"));
            assert!(parts[0].content == content, "content of len {len} differs after round trip");
            assert_eq!(parts[1].content, b"z7654321");
        }
    }

    #[test]
    fn test_round_trip_delimiter_lookalikes() {
        let content = b"\r\n--\r\n--not-the-boundary--\r\n\r\ncontent-type: text/plain\r\n\r\n".to_vec();
        let encoded = encode(&MemoryFile::new("tricky.txt", content.clone()), "tricky.txt", "a \"quoted\" user\r\nx").unwrap();

        let parts = parse_multipart(encoded.content_type(), encoded.body());
        assert_eq!(parts[0].content, content);
        assert_eq!(parts[1].content, b"a \"quoted\" user\r\nx");
    }

    #[test]
    fn test_round_trip_escaped_names() {
        let name = "q\"uo\\te d.csv";
        let encoded = encode(&MemoryFile::new(name, "x"), name, "me").unwrap();

        let parts = parse_multipart(encoded.content_type(), encoded.body());
        assert_eq!(parts[0].name, name);
        assert_eq!(parts[0].file_name.as_deref(), Some(name));
    }

    #[test]
    fn test_fresh_boundary_per_call() {
        let file = MemoryFile::new("same.txt", "same");
        let first = encode(&file, "same.txt", "me").unwrap();
        let second = encode(&file, "same.txt", "me").unwrap();

        assert_ne!(first.content_type(), second.content_type());
        assert_eq!(
            parse_multipart(first.content_type(), first.body()),
            parse_multipart(second.content_type(), second.body())
        );
    }

    #[test]
    fn test_releases_file_on_success() {
        let file = TrackedFile::new("ok.txt", "fine");
        encode(&file, "ok.txt", "me").unwrap();

        assert_eq!(file.opened(), 1);
        assert_eq!(file.closed(), 1);
    }

    #[test]
    fn test_releases_file_on_copy_error() {
        let file = TrackedFile::new("cut.bin", binary_content(10_000)).failing_after(5_000);
        let error = encode(&file, "cut.bin", "me").unwrap_err();

        assert!(matches!(error, EncodeError::Copy { .. }));
        assert_eq!(file.opened(), 1);
        assert_eq!(file.closed(), 1);
    }

    #[test]
    fn test_releases_file_on_part_error() {
        let file = TrackedFile::new("x", "data");
        let error = encode(&file, "bad\nname", "me").unwrap_err();

        assert!(matches!(error, EncodeError::PartCreation { .. }));
        assert_eq!(file.opened(), 1);
        assert_eq!(file.closed(), 1);
    }
}
