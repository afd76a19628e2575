//! Preview and download handlers.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use std::sync::Arc;

use crate::export;

use super::super::state::AppState;
use super::{HandlerError, error_response, parse_session_id, with_form};

/// GET /api/session/:id/preview - Rendered QR code as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_session_id(&id)?;
    let form = with_form(&state, id, |form| form.clone()).await?;
    let style = state.config.style;

    // Move CPU-intensive work to blocking thread pool
    let png_bytes = tokio::task::spawn_blocking(move || export::render_png(&form, &style))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Processing error: {}", e),
            )
        })?
        .map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        png_bytes,
    ))
}

/// GET /api/session/:id/download - PNG as a `qrcode-<millis>.png` attachment.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_session_id(&id)?;
    let form = with_form(&state, id, |form| form.clone()).await?;
    let style = state.config.style;
    let at = Utc::now();

    let dl = tokio::task::spawn_blocking(move || export::download(&form, &style, at))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Processing error: {}", e),
            )
        })?
        .map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", dl.filename),
            ),
        ],
        dl.bytes,
    ))
}
