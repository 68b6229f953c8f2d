//! Headers of a single multipart part
//!
//! Form parts carry a `Content-Disposition: form-data` header naming the field,
//! and for file parts the original filename plus an `application/octet-stream`
//! Content-Type. Names are quoted, with `\` and `"` escaped by a backslash.

use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::codec::MultipartError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartHeader {
    field_name: String,
    headers: HeaderMap,
}

impl PartHeader {
    /// Header for a file part named `field_name` carrying `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidHeader`] if either name contains characters
    /// that cannot appear in a header value (such as CR or LF). Empty names are
    /// accepted.
    pub fn form_file(field_name: &str, file_name: &str) -> Result<Self, MultipartError> {
        let disposition =
            format!("form-data; name=\"{}\"; filename=\"{}\"", escape_quotes(field_name), escape_quotes(file_name));

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_DISPOSITION, header_value(&disposition)?);
        headers.insert(CONTENT_TYPE, header_value(mime::APPLICATION_OCTET_STREAM.as_ref())?);

        Ok(Self { field_name: field_name.to_owned(), headers })
    }

    /// Header for a plain text field part named `field_name`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PartHeader::form_file`].
    pub fn form_field(field_name: &str) -> Result<Self, MultipartError> {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(field_name));

        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(CONTENT_DISPOSITION, header_value(&disposition)?);

        Ok(Self { field_name: field_name.to_owned(), headers })
    }

    /// Adds or replaces a header on this part.
    pub fn insert(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn header_value(value: &str) -> Result<HeaderValue, MultipartError> {
    HeaderValue::from_str(value).map_err(|e| MultipartError::invalid_header(format!("{e}: {value:?}")))
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
