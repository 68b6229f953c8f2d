//! Multipart boundary tokens
//!
//! A boundary delimits the parts of a multipart body and must not occur inside any
//! part's content. [`Boundary::random`] draws 128 random bits, rendered as 32 hex
//! digits, for every body. [`Boundary::new`] accepts a caller chosen token after
//! checking it against the RFC 2046 grammar:
//!
//! ```text
//! boundary := 0*69<bchars> bcharsnospace
//! bchars   := bcharsnospace / " "
//! bcharsnospace := DIGIT / ALPHA / "'" / "(" / ")" / "+" / "_" / "," / "-" / "." / "/" / ":" / "=" / "?"
//! ```

use std::fmt;

use uuid::Uuid;

use crate::codec::MultipartError;
use crate::ensure;

/// Maximum boundary length allowed by RFC 2046
const MAX_BOUNDARY_LEN: usize = 70;

/// Characters that force the boundary parameter to be quoted in a Content-Type value
const TSPECIALS: &[u8] = b"()<>@,;:\\\"/[]?= ";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Validates `value` as a boundary token.
    ///
    /// # Errors
    ///
    /// Returns [`MultipartError::InvalidBoundary`] if `value` is empty, longer than
    /// 70 characters, contains a character outside `bchars`, or ends with a space.
    pub fn new(value: impl Into<String>) -> Result<Self, MultipartError> {
        let value = value.into();

        ensure!(
            !value.is_empty() && value.len() <= MAX_BOUNDARY_LEN,
            MultipartError::invalid_boundary(format!("length {} is outside 1..={MAX_BOUNDARY_LEN}", value.len()))
        );

        if let Some(invalid) = value.bytes().find(|b| !is_bchar(*b)) {
            return Err(MultipartError::invalid_boundary(format!("character {:?} is not allowed", char::from(invalid))));
        }

        ensure!(!value.ends_with(' '), MultipartError::invalid_boundary("boundary ends with a space"));

        Ok(Self(value))
    }

    /// Generates a fresh random boundary.
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `multipart/form-data` Content-Type value carrying this boundary.
    pub fn content_type(&self) -> String {
        if self.0.bytes().any(|b| TSPECIALS.contains(&b)) {
            format!("{}; boundary=\"{}\"", mime::MULTIPART_FORM_DATA, self.0)
        } else {
            format!("{}; boundary={}", mime::MULTIPART_FORM_DATA, self.0)
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Boundary {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_bchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"'()+_,-./:=? ".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_valid_and_fresh() {
        let first = Boundary::random();
        let second = Boundary::random();

        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 32);
        assert!(Boundary::new(first.as_str()).is_ok());
    }

    #[test]
    fn test_content_type() {
        let boundary = Boundary::new("abc123").unwrap();
        assert_eq!(boundary.content_type(), "multipart/form-data; boundary=abc123");

        let boundary = Boundary::new("with space:and=more").unwrap();
        assert_eq!(boundary.content_type(), "multipart/form-data; boundary=\"with space:and=more\"");
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(Boundary::new(""), Err(MultipartError::InvalidBoundary { .. })));
        assert!(matches!(Boundary::new("a".repeat(71)), Err(MultipartError::InvalidBoundary { .. })));
        assert!(matches!(Boundary::new("trailing "), Err(MultipartError::InvalidBoundary { .. })));
        assert!(matches!(Boundary::new("semi;colon"), Err(MultipartError::InvalidBoundary { .. })));
        assert!(matches!(Boundary::new("line\r\nbreak"), Err(MultipartError::InvalidBoundary { .. })));
    }

    #[test]
    fn test_max_length() {
        assert!(Boundary::new("a".repeat(70)).is_ok());
    }
}
