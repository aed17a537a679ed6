//! PDF Refit Core Library
//!
//! This library provides the core functionality for refitting PDF documents:
//! - Pre-flight validation of user-supplied files
//! - Document loading with role-tagged error classification
//! - Contain-fit page scaling and centering
//! - Composite document assembly and serialization
//!
//! The pipeline takes a *content* document and a *style* document and
//! produces a new PDF in which every content page is rescaled and centered
//! on a page the size of the style document's first page.

pub mod config;
pub mod error;
pub mod pdf;
pub mod source;
pub mod util;

pub use config::AppConfig;
pub use error::{Error, ErrorCode, Result};
pub use pdf::document::LoadedDocument;
pub use pdf::fit::{PageFit, fit};
pub use source::{DEFAULT_MAX_SOURCE_BYTES, PDF_MEDIA_TYPE, SourceFile, SourceRole};

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

/// High-level refit pipeline that combines all components.
///
/// Stages run strictly in order: validate, load, compose, serialize. The
/// first failure short-circuits the run with its classified error; the
/// returned `Result` is the only output channel, there is no shared
/// result/error state. Only one run may be in flight at a time; overlapping
/// calls are refused with [`Error::Busy`].
pub struct PdfRefitter {
    config: AppConfig,
    running: AtomicBool,
}

/// Result of a successful refit run
#[derive(Debug)]
pub struct RefitOutput {
    /// Serialized composite PDF
    pub bytes: Vec<u8>,
    /// Number of pages in the composite (equals the content page count)
    pub page_count: usize,
}

impl PdfRefitter {
    /// Create a new refitter with the given configuration
    #[must_use]
    pub const fn new(config: AppConfig) -> Self {
        Self {
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Run the full pipeline and return the composite PDF.
    pub fn refit(&self, content: &SourceFile, style: &SourceFile) -> Result<RefitOutput> {
        self.refit_with_progress(content, style, None)
    }

    /// Run the full pipeline, reporting per-page progress as `(done, total)`.
    pub fn refit_with_progress(
        &self,
        content: &SourceFile,
        style: &SourceFile,
        progress: Option<&dyn Fn(usize, usize)>,
    ) -> Result<RefitOutput> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }

        let result = self.run(content, style, progress);
        self.running.store(false, Ordering::SeqCst);
        result
    }

    fn run(
        &self,
        content: &SourceFile,
        style: &SourceFile,
        progress: Option<&dyn Fn(usize, usize)>,
    ) -> Result<RefitOutput> {
        debug!("Validating {} and {}", content.name, style.name);
        content.validate(SourceRole::Content, self.config.max_source_bytes)?;
        style.validate(SourceRole::Style, self.config.max_source_bytes)?;

        let content_doc = LoadedDocument::from_bytes(&content.bytes, SourceRole::Content)?;
        let style_doc = LoadedDocument::from_bytes(&style.bytes, SourceRole::Style)?;
        info!(
            "Refitting {} ({} pages) to the page size of {}",
            content.name,
            content_doc.page_count(),
            style.name
        );

        let composed = pdf::compose(&content_doc, &style_doc, &self.config.pdf_version, progress)?;
        let bytes = pdf::serialize(composed)?;

        debug!("Composite PDF serialized ({} bytes)", bytes.len());
        Ok(RefitOutput {
            bytes,
            page_count: content_doc.page_count(),
        })
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let refitter = PdfRefitter::new(AppConfig::default());
        assert_eq!(refitter.config().max_source_bytes, 10 * 1024 * 1024);
        assert!(!refitter.is_running());
    }

    #[test]
    fn test_overlapping_run_refused() {
        let refitter = PdfRefitter::new(AppConfig::default());
        refitter.running.store(true, Ordering::SeqCst);

        let file = SourceFile::new("a.pdf", PDF_MEDIA_TYPE, vec![0_u8; 8]);
        let err = refitter.refit(&file, &file).unwrap_err();
        assert!(matches!(err, Error::Busy));

        // The refused call must not clear the in-flight marker.
        assert!(refitter.is_running());
    }

    #[test]
    fn test_flag_released_after_failure() {
        let refitter = PdfRefitter::new(AppConfig::default());
        let bad = SourceFile::new("a.txt", "text/plain", vec![0_u8; 8]);
        let pdf = SourceFile::new("b.pdf", PDF_MEDIA_TYPE, vec![0_u8; 8]);

        assert!(refitter.refit(&bad, &pdf).is_err());
        assert!(!refitter.is_running());

        // A later run is accepted again (and fails on parsing, not Busy).
        let err = refitter.refit(&pdf, &pdf).unwrap_err();
        assert!(matches!(err, Error::ContentParse(_)));
    }
}
