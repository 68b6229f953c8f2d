//! Test fixtures shared by the unit tests.

use std::io;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::buf::Reader;
use bytes::{Buf, Bytes};

use crate::file::FormFile;

/// Routes `tracing` output through the test harness so it shows for failing tests.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_test_writer().try_init();
}

/// A form file counting how often it is opened and how often its streams are dropped.
#[derive(Debug, Clone)]
pub(crate) struct TrackedFile {
    file_name: String,
    content: Bytes,
    fail_after: Option<usize>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl TrackedFile {
    pub(crate) fn new(file_name: &str, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.to_owned(),
            content: content.into(),
            fail_after: None,
            opened: Arc::default(),
            closed: Arc::default(),
        }
    }

    /// Streams fail with `BrokenPipe` once `bytes` bytes have been read.
    pub(crate) fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl FormFile for TrackedFile {
    type Stream = TrackedStream;

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn open(&self) -> io::Result<Self::Stream> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(TrackedStream {
            inner: self.content.clone().reader(),
            remaining: self.fail_after,
            closed: Arc::clone(&self.closed),
        })
    }
}

#[derive(Debug)]
pub(crate) struct TrackedStream {
    inner: Reader<Bytes>,
    remaining: Option<usize>,
    closed: Arc<AtomicUsize>,
}

impl Read for TrackedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.remaining {
            Some(0) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "upload stream cut")),
            Some(remaining) => {
                let limit = remaining.min(buf.len());
                let read = self.inner.read(&mut buf[..limit])?;
                self.remaining = Some(remaining - read);
                Ok(read)
            }
            None => self.inner.read(buf),
        }
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// One part of a parsed multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub(crate) name: String,
    pub(crate) file_name: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) content: Vec<u8>,
}

/// Splits a `multipart/form-data` body into its parts, panicking on any deviation
/// from the wire format.
pub(crate) fn parse_multipart(content_type: &str, body: &[u8]) -> Vec<Part> {
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("content type is multipart/form-data with a boundary")
        .trim_matches('"');
    assert!(!boundary.is_empty());

    let delimiter = format!("\r\n--{boundary}");
    let mut rest = body.strip_prefix(&delimiter.as_bytes()[2..]).expect("body starts with a delimiter");
    let mut parts = vec![];

    loop {
        if let Some(tail) = rest.strip_prefix(b"--") {
            assert_eq!(tail, b"\r\n", "nothing may follow the close delimiter");
            return parts;
        }
        rest = rest.strip_prefix(b"\r\n").expect("delimiter is followed by CRLF");

        let mut headers = [httparse::EMPTY_HEADER; 16];
        let (offset, headers) = match httparse::parse_headers(rest, &mut headers).expect("valid part headers") {
            httparse::Status::Complete(parsed) => parsed,
            httparse::Status::Partial => panic!("part headers are not terminated"),
        };

        let mut disposition = None;
        let mut part_content_type = None;
        for header in headers {
            let value = std::str::from_utf8(header.value).unwrap().to_owned();
            if header.name.eq_ignore_ascii_case("content-disposition") {
                disposition = Some(value);
            } else if header.name.eq_ignore_ascii_case("content-type") {
                part_content_type = Some(value);
            }
        }
        let (name, file_name) = parse_disposition(&disposition.expect("part has a content-disposition"));

        let content = &rest[offset..];
        let end = find(content, delimiter.as_bytes()).expect("part is followed by a delimiter");

        parts.push(Part { name, file_name, content_type: part_content_type, content: content[..end].to_vec() });
        rest = &content[end + delimiter.len()..];
    }
}

fn parse_disposition(value: &str) -> (String, Option<String>) {
    let mut params = value.strip_prefix("form-data").expect("form-data disposition");
    let mut name = None;
    let mut file_name = None;

    while let Some(param) = params.strip_prefix("; ") {
        let (key, quoted) = param.split_once('=').expect("param has a value");
        let (value, remaining) = unquote(quoted);
        match key {
            "name" => name = Some(value),
            "filename" => file_name = Some(value),
            other => panic!("unexpected disposition param {other}"),
        }
        params = remaining;
    }
    assert!(params.is_empty(), "trailing disposition text {params:?}");

    (name.expect("part has a name"), file_name)
}

fn unquote(quoted: &str) -> (String, &str) {
    let mut chars = quoted.strip_prefix('"').expect("quoted value").char_indices();
    let mut value = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => value.push(chars.next().expect("escaped char").1),
            '"' => return (value, &quoted[i + 2..]),
            c => value.push(c),
        }
    }
    panic!("unterminated quoted value {quoted:?}")
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
