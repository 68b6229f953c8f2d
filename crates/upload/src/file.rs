//! Uploaded file handles
//!
//! Both the form encoder and the table decoder consume their input through the
//! [`FormFile`] capability rather than a concrete I/O type. An upload handling
//! layer hands out implementations of it; tests use [`MemoryFile`].
//!
//! Opening a [`FormFile`] yields an owned [`Read`] stream. Dropping the stream
//! closes it, so a stream held in a local binding is released on every exit path.

use bytes::buf::Reader;
use bytes::{Buf, Bytes};
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A readable uploaded file with an associated name.
pub trait FormFile {
    /// The stream returned by [`FormFile::open`]; closed when dropped.
    type Stream: Read;

    /// The name the file was uploaded under.
    fn file_name(&self) -> &str;

    /// Opens the file for reading.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened.
    fn open(&self) -> io::Result<Self::Stream>;
}

impl<F: FormFile + ?Sized> FormFile for &F {
    type Stream = F::Stream;

    fn file_name(&self) -> &str {
        (**self).file_name()
    }

    fn open(&self) -> io::Result<Self::Stream> {
        (**self).open()
    }
}

/// An uploaded file held entirely in memory.
///
/// Opening it is infallible and cheap: every stream shares the same [`Bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    file_name: String,
    content: Bytes,
}

impl MemoryFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self { file_name: file_name.into(), content: content.into() }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl FormFile for MemoryFile {
    type Stream = Reader<Bytes>;

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn open(&self) -> io::Result<Self::Stream> {
        Ok(self.content.clone().reader())
    }
}

/// An uploaded file spooled to the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFile {
    file_name: String,
    path: PathBuf,
}

impl DiskFile {
    /// Creates a handle for `path`, reported under `file_name`.
    ///
    /// The path is not touched until [`FormFile::open`] is called.
    pub fn new(file_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { file_name: file_name.into(), path: path.into() }
    }

    /// Creates a handle named after the last component of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        Self::new(file_name, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FormFile for DiskFile {
    type Stream = File;

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn open(&self) -> io::Result<Self::Stream> {
        File::open(&self.path)
    }
}
