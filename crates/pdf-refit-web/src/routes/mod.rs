//! HTTP route handlers for the PDF refit web application.
//!
//! Page routes return HTML (Askama templates); the download route returns
//! the composite PDF as a binary attachment.

mod download;
mod pages;
mod refit;

pub use download::download_pdf;
pub use pages::{index, result_page};
pub use refit::refit_pdfs;
