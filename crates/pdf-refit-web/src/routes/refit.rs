//! Refit route - two-file upload and pipeline execution.
//!
//! Follows the POST-Redirect-GET pattern: a successful run redirects to the
//! result page (via `HX-Redirect` for HTMX clients, 303 See Other for plain
//! form submissions). Failures come back as `CODE: message` text so the
//! caller knows which file to fix.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use pdf_refit_core::{Error, SourceFile, SourceRole};
use std::sync::Arc;
use tracing::{error, info};

use crate::helpers::{ResultExt, RouteResult};
use crate::state::AppState;

/// Run the refit pipeline on an uploaded content/style pair.
pub async fn refit_pdfs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let mut content: Option<SourceFile> = None;
    let mut style: Option<SourceFile> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name != "content" && name != "style" {
            continue;
        }

        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        // Browsers declare the type; fall back to a guess from the file name
        let media_type = field.content_type().map_or_else(
            || {
                mime_guess::from_path(&filename)
                    .first_raw()
                    .unwrap_or("")
                    .to_string()
            },
            ToString::to_string,
        );

        let data = field.bytes().await.or_bad_request()?;
        let file = SourceFile::new(filename, media_type, data.to_vec());

        if name == "content" {
            content = Some(file);
        } else {
            style = Some(file);
        }
    }

    let Some(content) = content else {
        return Err((StatusCode::BAD_REQUEST, "No content file uploaded".to_string()));
    };
    let Some(style) = style else {
        return Err((StatusCode::BAD_REQUEST, "No style file uploaded".to_string()));
    };

    // Pre-flight validation before any pipeline stage runs
    let max_bytes = state.config.max_source_bytes;
    content
        .validate(SourceRole::Content, max_bytes)
        .map_err(reject)?;
    style.validate(SourceRole::Style, max_bytes).map_err(reject)?;

    let content_name = content.name.clone();
    let style_name = style.name.clone();

    // Run the pipeline in a blocking task to avoid blocking the async runtime
    let run_state = Arc::clone(&state);
    let output = tokio::task::spawn_blocking(move || run_state.refitter.refit(&content, &style))
        .await
        .map_err(|e| {
            error!("Refit task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Refit failed".to_string(),
            )
        })?
        .map_err(reject)?;

    let page_count = output.page_count;
    let session_id = state
        .create_session(
            Bytes::from(output.bytes),
            content_name.clone(),
            style_name,
            page_count,
        )
        .await;

    info!(
        "Created session {} for {} ({} pages)",
        session_id, content_name, page_count
    );

    // POST-Redirect-GET pattern
    let redirect_url = format!("/result/{session_id}");

    // Check if this is an HTMX request
    let is_htmx = headers.get("HX-Request").is_some();

    if is_htmx {
        // HX-Redirect tells HTMX to do a full page navigation
        Response::builder()
            .status(StatusCode::OK)
            .header("HX-Redirect", redirect_url)
            .body(Body::empty())
            .or_internal_error()
    } else {
        // Standard HTTP redirect for non-JS clients (303 See Other)
        Response::builder()
            .status(StatusCode::SEE_OTHER)
            .header(header::LOCATION, redirect_url)
            .body(Body::empty())
            .or_internal_error()
    }
}

/// Map a classified pipeline error onto an HTTP status, keeping its code.
fn reject(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::Busy => StatusCode::CONFLICT,
        Error::InvalidSource { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, format!("{}: {err}", err.code()))
}
