//! # HTTP Server for the QR Generator Form
//!
//! Serves the browser form and keeps one [`FormState`](crate::form::FormState)
//! per browser session on the server.
//!
//! ## Usage
//!
//! ```bash
//! qrlogo serve --listen 0.0.0.0:8080
//! ```
//!
//! Then open http://localhost:8080 in a browser.

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, LOGO_UPLOAD_LIMIT, SESSION_EXPIRATION_SECS, ServerConfig, Session};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;

use crate::error::QrLogoError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Session / form API
        .route("/api/session", post(handlers::session::create))
        .route("/api/session/:id", get(handlers::session::show))
        .route("/api/session/:id/text", put(handlers::session::set_text))
        .route(
            "/api/session/:id/logo",
            post(handlers::session::upload_logo).layer(DefaultBodyLimit::max(LOGO_UPLOAD_LIMIT)),
        )
        .route(
            "/api/session/:id/logo-scale",
            put(handlers::session::set_logo_scale),
        )
        .route("/api/session/:id/generate", post(handlers::session::generate))
        .route("/api/session/:id/reset", post(handlers::session::reset))
        // Export API
        .route("/api/session/:id/preview", get(handlers::export::preview))
        .route("/api/session/:id/download", get(handlers::export::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use qrlogo::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), qrlogo::error::QrLogoError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..ServerConfig::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), QrLogoError> {
    let app_state = Arc::new(AppState::new(config.clone()));

    // Spawn background session cleanup task
    tokio::spawn(cleanup_sessions(app_state.clone()));

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| QrLogoError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    tracing::info!(
        addr = %config.listen_addr,
        "qrlogo HTTP server listening, open http://{}/ in your browser",
        config.listen_addr
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| QrLogoError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to drop expired sessions.
async fn cleanup_sessions(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));

    loop {
        interval.tick().await;
        let removed = state.expire_sessions(Instant::now()).await;
        if removed > 0 {
            let remaining = state.sessions.read().await.len();
            tracing::info!(removed, remaining, "cleaned up expired sessions");
        }
    }
}
