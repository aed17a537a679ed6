use thiserror::Error;

use crate::source::SourceRole;

/// Unified error type for pdf-refit-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Pre-flight input validation (media type, size, overlapping runs)
/// - Document loading (reading, parsing, empty documents)
/// - Page processing (geometry, embedding, drawing)
/// - Serialization of the composite document
/// - Configuration and general I/O
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Input Validation Errors
    // ==========================================================================
    /// A selected file failed pre-flight validation (wrong type, too large, empty)
    #[error("invalid {role} file: {reason}")]
    InvalidSource { role: SourceRole, reason: String },

    /// A refit run was requested while another one is in flight
    #[error("a refit run is already in progress")]
    Busy,

    // ==========================================================================
    // Read Errors
    // ==========================================================================
    /// Failed to read the content file's bytes
    #[error("failed to read content file: {0}")]
    ContentRead(String),

    /// Failed to read the style file's bytes
    #[error("failed to read style file: {0}")]
    StyleRead(String),

    // ==========================================================================
    // Parse Errors
    // ==========================================================================
    /// The content buffer is not a well-formed PDF
    #[error("failed to parse content PDF: {0}")]
    ContentParse(String),

    /// The style buffer is not a well-formed PDF
    #[error("failed to parse style PDF: {0}")]
    StyleParse(String),

    /// The content PDF parsed but contains no pages
    #[error("content PDF has no pages")]
    ContentEmpty,

    /// The style PDF parsed but contains no pages
    #[error("style PDF has no pages")]
    StyleEmpty,

    // ==========================================================================
    // Page Processing Errors
    // ==========================================================================
    /// Embedding or drawing a content page failed
    #[error("failed to process page {page}: {reason}")]
    PageProcessing { page: usize, reason: String },

    /// A page reported non-positive dimensions
    #[error("invalid page dimensions {width}x{height}")]
    InvalidPageSize { width: f32, height: f32 },

    // ==========================================================================
    // Serialization Errors
    // ==========================================================================
    /// Failed to serialize the composite PDF
    #[error("failed to save composite PDF: {0}")]
    Save(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Read failure for the given input role.
    pub fn read(role: SourceRole, reason: impl Into<String>) -> Self {
        match role {
            SourceRole::Content => Self::ContentRead(reason.into()),
            SourceRole::Style => Self::StyleRead(reason.into()),
        }
    }

    /// Parse failure for the given input role.
    pub fn parse(role: SourceRole, reason: impl Into<String>) -> Self {
        match role {
            SourceRole::Content => Self::ContentParse(reason.into()),
            SourceRole::Style => Self::StyleParse(reason.into()),
        }
    }

    /// Empty-document failure for the given input role.
    #[must_use]
    pub const fn empty(role: SourceRole) -> Self {
        match role {
            SourceRole::Content => Self::ContentEmpty,
            SourceRole::Style => Self::StyleEmpty,
        }
    }

    /// The stable code surfaced to callers for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ContentRead(_) => ErrorCode::ContentReadError,
            Self::StyleRead(_) => ErrorCode::StyleReadError,
            Self::ContentParse(_) => ErrorCode::ContentParseError,
            Self::StyleParse(_) => ErrorCode::StyleParseError,
            Self::ContentEmpty => ErrorCode::ContentEmpty,
            Self::StyleEmpty => ErrorCode::StyleEmpty,
            Self::PageProcessing { .. } | Self::InvalidPageSize { .. } => {
                ErrorCode::PageProcessingError
            }
            Self::Save(_) => ErrorCode::SaveError,
            Self::InvalidSource { .. } | Self::Busy | Self::ConfigLoad(_) | Self::Io(_) => {
                ErrorCode::InvalidInput
            }
        }
    }
}

/// Stable error codes for pipeline failures.
///
/// Each classified stage failure maps onto exactly one code; pre-flight
/// validation failures share the generic `InvalidInput` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ContentReadError,
    StyleReadError,
    ContentParseError,
    StyleParseError,
    ContentEmpty,
    StyleEmpty,
    PageProcessingError,
    SaveError,
    InvalidInput,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentReadError => "CONTENT_READ_ERROR",
            Self::StyleReadError => "STYLE_READ_ERROR",
            Self::ContentParseError => "CONTENT_PARSE_ERROR",
            Self::StyleParseError => "STYLE_PARSE_ERROR",
            Self::ContentEmpty => "CONTENT_EMPTY",
            Self::StyleEmpty => "STYLE_EMPTY",
            Self::PageProcessingError => "PAGE_PROCESSING_ERROR",
            Self::SaveError => "SAVE_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_constructors() {
        assert!(matches!(
            Error::read(SourceRole::Content, "boom"),
            Error::ContentRead(_)
        ));
        assert!(matches!(
            Error::parse(SourceRole::Style, "boom"),
            Error::StyleParse(_)
        ));
        assert!(matches!(Error::empty(SourceRole::Content), Error::ContentEmpty));
        assert!(matches!(Error::empty(SourceRole::Style), Error::StyleEmpty));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::parse(SourceRole::Style, "x").code().as_str(),
            "STYLE_PARSE_ERROR"
        );
        assert_eq!(Error::ContentEmpty.code().as_str(), "CONTENT_EMPTY");
        assert_eq!(
            Error::PageProcessing {
                page: 3,
                reason: "x".to_string()
            }
            .code()
            .as_str(),
            "PAGE_PROCESSING_ERROR"
        );
        assert_eq!(Error::Save("x".to_string()).code().as_str(), "SAVE_ERROR");
        assert_eq!(Error::Busy.code().as_str(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_page_size_is_page_processing() {
        let err = Error::InvalidPageSize {
            width: 0.0,
            height: 100.0,
        };
        assert_eq!(err.code(), ErrorCode::PageProcessingError);
    }
}
