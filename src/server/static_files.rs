//! Static file serving for the frontend.
//!
//! The page reads the form limits from `window.__QRLOGO`, injected into
//! index.html at serve time.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use include_dir::{Dir, include_dir};
use serde::Serialize;
use std::sync::Arc;

use crate::form::{DEFAULT_LOGO_DIMENSION, LOGO_SCALE, LOGO_SLIDER_MAX, MAX_LOGO_BYTES};

use super::state::AppState;

/// Embedded frontend files.
static FRONTEND_DIST: Dir = include_dir!("$CARGO_MANIFEST_DIR/frontend/dist");

/// Form limits handed to the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Logos at or above this size are rejected at generation time
    pub max_logo_bytes: u64,
    pub slider_max: f64,
    /// Slider position matching the default logo dimension
    pub default_slider: f64,
}

impl PageConfig {
    pub fn current() -> Self {
        Self {
            max_logo_bytes: MAX_LOGO_BYTES,
            slider_max: LOGO_SLIDER_MAX,
            default_slider: DEFAULT_LOGO_DIMENSION / LOGO_SCALE,
        }
    }
}

/// Append `?v=<boot_time>` to script/stylesheet references and inject the
/// page config before `</head>`.
fn prepare_index(html: &str, boot_time: u64, config: &PageConfig) -> Result<String, serde_json::Error> {
    let cache_bust = format!("?v={}", boot_time);
    let config_json = serde_json::to_string(config)?;

    Ok(html
        .replace(".js\"", &format!(".js{}\"", cache_bust))
        .replace(".css\"", &format!(".css{}\"", cache_bust))
        .replace(
            "</head>",
            &format!("<script>window.__QRLOGO={}</script></head>", config_json),
        ))
}

/// GET / - The form page.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(file) = FRONTEND_DIST.get_file("index.html") else {
        return (StatusCode::NOT_FOUND, "Frontend not built").into_response();
    };

    let contents = String::from_utf8_lossy(file.contents());
    match prepare_index(&contents, state.boot_time, &PageConfig::current()) {
        Ok(html) => Html(html).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to build page config: {}", e),
        )
            .into_response(),
    }
}

/// GET /assets/*path - Embedded asset with its mime type.
pub async fn asset_handler(Path(path): Path<String>) -> impl IntoResponse {
    let clean_path = path.split('?').next().unwrap_or(&path);

    match FRONTEND_DIST.get_file(format!("assets/{}", clean_path)) {
        Some(file) => {
            let mime = mime_guess::from_path(clean_path)
                .first_or_octet_stream()
                .to_string();
            // Safe to cache forever: index.html busts asset URLs per boot
            (
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CACHE_CONTROL, "public, max-age=31536000".to_string()),
                ],
                file.contents().to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}
