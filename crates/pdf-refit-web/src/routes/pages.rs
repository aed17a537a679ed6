//! Page routes - full HTML page renders.

use axum::extract::{Path, State};
use std::sync::Arc;

use crate::helpers::{OptionExt, RouteResult};
use crate::state::AppState;
use crate::templates::{IndexTemplate, ResultTemplate};

/// Landing page with the upload form.
pub async fn index(State(state): State<Arc<AppState>>) -> IndexTemplate {
    IndexTemplate {
        max_mib: state.config.max_source_bytes / (1024 * 1024),
    }
}

/// Result page for a finished run, linking to the download.
pub async fn result_page(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> RouteResult<ResultTemplate> {
    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let (content_filename, style_filename, page_count, download_name) = session
        .with_session(|s| {
            (
                s.content_filename.clone(),
                s.style_filename.clone(),
                s.page_count,
                s.download_name.clone(),
            )
        })
        .await
        .or_not_found("Session not found")?;

    Ok(ResultTemplate {
        session_id,
        content_filename,
        style_filename,
        page_count,
        download_name,
    })
}
