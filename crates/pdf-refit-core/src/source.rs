//! User-supplied input files and their pre-flight validation.
//!
//! Validation only looks at the declared metadata (media type and byte
//! length), never at the buffer's contents - a rejected file is never parsed.

use crate::error::{Error, Result};

/// The only media type accepted for either input.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Default upper bound on a single input file (10 MiB).
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;

/// Which role an input file plays in the pipeline.
///
/// The role determines which side's error code a failure maps to, so the
/// caller always knows which of the two files to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRole {
    /// The document whose pages are rescaled
    Content,
    /// The document whose first page supplies the target size
    Style,
}

impl SourceRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Style => "style",
        }
    }
}

impl std::fmt::Display for SourceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed byte buffer supplied by the user.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, kept for messages and output naming
    pub name: String,
    /// Declared media type (from the browser or guessed from the path)
    pub media_type: String,
    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pre-flight validation: declared media type and byte length only.
    pub fn validate(&self, role: SourceRole, max_bytes: u64) -> Result<()> {
        if self.media_type != PDF_MEDIA_TYPE {
            return Err(Error::InvalidSource {
                role,
                reason: format!(
                    "expected {PDF_MEDIA_TYPE}, got {}",
                    if self.media_type.is_empty() {
                        "no media type"
                    } else {
                        &self.media_type
                    }
                ),
            });
        }

        if self.bytes.is_empty() {
            return Err(Error::InvalidSource {
                role,
                reason: "file is empty".to_string(),
            });
        }

        if self.len() > max_bytes {
            return Err(Error::InvalidSource {
                role,
                reason: format!("file is {} bytes, limit is {max_bytes} bytes", self.len()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn pdf_file(len: usize) -> SourceFile {
        SourceFile::new("doc.pdf", PDF_MEDIA_TYPE, vec![0_u8; len])
    }

    #[test]
    fn test_valid_pdf_accepted() {
        assert!(pdf_file(1024)
            .validate(SourceRole::Content, DEFAULT_MAX_SOURCE_BYTES)
            .is_ok());
    }

    #[test]
    fn test_wrong_media_type_rejected() {
        let file = SourceFile::new("notes.txt", "text/plain", vec![0_u8; 16]);
        let err = file
            .validate(SourceRole::Content, DEFAULT_MAX_SOURCE_BYTES)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(err.to_string().contains("text/plain"));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let file = pdf_file(11 * 1024 * 1024);
        let err = file
            .validate(SourceRole::Style, DEFAULT_MAX_SOURCE_BYTES)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_file_at_limit_accepted() {
        let file = pdf_file(DEFAULT_MAX_SOURCE_BYTES as usize);
        assert!(file
            .validate(SourceRole::Content, DEFAULT_MAX_SOURCE_BYTES)
            .is_ok());
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = pdf_file(0)
            .validate(SourceRole::Content, DEFAULT_MAX_SOURCE_BYTES)
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let file = pdf_file(1024);
        assert!(file
            .validate(SourceRole::Content, DEFAULT_MAX_SOURCE_BYTES)
            .is_ok());
        assert!(file
            .validate(SourceRole::Content, DEFAULT_MAX_SOURCE_BYTES)
            .is_ok());
    }
}
