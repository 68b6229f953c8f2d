use std::io;
use thiserror::Error;

use crate::codec::{MultipartError, ParseError};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("encode error: {source}")]
    EncodeError {
        #[from]
        source: EncodeError,
    },

    #[error("decode error: {source}")]
    DecodeError {
        #[from]
        source: DecodeError,
    },
}

/// Errors of [`FormEncoder::encode`](crate::form::FormEncoder::encode).
///
/// Any of them means the whole encoding failed; no partial body is returned.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("error opening '{file_name}' file: {source}")]
    Open { file_name: String, source: io::Error },

    /// A part name holds characters not allowed in a header value. Empty names are valid.
    #[error("error creating multipart part '{part_name}' for '{file_name}': {source}")]
    PartCreation { file_name: String, part_name: String, source: MultipartError },

    #[error("error copying '{file_name}' to multipart: {source}")]
    Copy { file_name: String, source: io::Error },
}

impl EncodeError {
    pub fn open<S: ToString>(file_name: S, source: io::Error) -> Self {
        Self::Open { file_name: file_name.to_string(), source }
    }

    pub fn part_creation<S: ToString, P: ToString>(file_name: S, part_name: P, source: MultipartError) -> Self {
        Self::PartCreation { file_name: file_name.to_string(), part_name: part_name.to_string(), source }
    }

    pub fn copy<S: ToString>(file_name: S, source: io::Error) -> Self {
        Self::Copy { file_name: file_name.to_string(), source }
    }

    /// The name of the file being encoded when the error occurred.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Open { file_name, .. } | Self::PartCreation { file_name, .. } | Self::Copy { file_name, .. } => file_name,
        }
    }
}

/// Errors of [`TableDecoder::decode`](crate::form::TableDecoder::decode).
///
/// Any of them means the whole decoding failed; no partial table is returned.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("error opening '{file_name}' file: {source}")]
    Open { file_name: String, source: io::Error },

    #[error("error parsing the first line in '{file_name}' file: {source}")]
    HeaderParse { file_name: String, source: ParseError },

    #[error("error parsing the '{file_name}' file: {source}")]
    BodyParse { file_name: String, source: ParseError },
}

impl DecodeError {
    pub fn open<S: ToString>(file_name: S, source: io::Error) -> Self {
        Self::Open { file_name: file_name.to_string(), source }
    }

    pub fn header_parse<S: ToString>(file_name: S, source: ParseError) -> Self {
        Self::HeaderParse { file_name: file_name.to_string(), source }
    }

    pub fn body_parse<S: ToString>(file_name: S, source: ParseError) -> Self {
        Self::BodyParse { file_name: file_name.to_string(), source }
    }

    /// The name of the file being decoded when the error occurred.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Open { file_name, .. } | Self::HeaderParse { file_name, .. } | Self::BodyParse { file_name, .. } => {
                file_name
            }
        }
    }
}
