//! HTTP handlers for the server.

pub mod export;
pub mod session;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::error::QrLogoError;
use crate::form::FormState;

use super::state::AppState;

pub(crate) type HandlerError = (StatusCode, String);

pub(crate) fn parse_session_id(id: &str) -> Result<Uuid, HandlerError> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

/// Run `f` on a session's form under the write lock, touching the session.
pub(crate) async fn with_form<T>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut FormState) -> T,
) -> Result<T, HandlerError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, "Session not found or expired".to_string()))?;
    session.touch();
    Ok(f(&mut session.form))
}

pub(crate) fn error_response(e: QrLogoError) -> HandlerError {
    let status = match e {
        QrLogoError::NotRendered => StatusCode::CONFLICT,
        QrLogoError::Encode(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QrLogoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
