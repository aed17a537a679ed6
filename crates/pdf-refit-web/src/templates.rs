//! Askama templates for the upload and result pages.
//!
//! The pages are self-contained (inline styling, no static assets) and
//! degrade gracefully: the upload form works as a plain POST, and HTMX
//! clients get an `HX-Redirect` instead of a 303.

use askama::Template;
use askama_web::WebTemplate;

/// Landing page with the two-file upload form.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Upload limit per file, in MiB, shown next to the inputs
    pub max_mib: u64,
}

/// Result page after a successful run, with the download link.
#[derive(Template, WebTemplate)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub session_id: String,
    pub content_filename: String,
    pub style_filename: String,
    pub page_count: usize,
    pub download_name: String,
}
