//! Form session API handlers.
//!
//! Each handler maps one form operation onto the session's [`FormState`].
//! Validation problems are part of the returned [`FormView`], not HTTP
//! errors.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::form::{DecodeJob, FormView, LOGO_SLIDER_MAX, LogoAxis, LogoFile};

use super::super::state::{AppState, Session};
use super::{HandlerError, parse_session_id, with_form};

/// Response carrying the session id and its form.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub form: FormView,
}

/// Response from the logo upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// True while the logo is being decoded in the background
    pub decoding: bool,
    pub form: FormView,
}

/// Response from the generate endpoint.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub ok: bool,
    pub form: FormView,
}

/// Request body for the text endpoint.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Request body for the logo-scale endpoint.
#[derive(Debug, Deserialize)]
pub struct LogoScaleRequest {
    pub axis: LogoAxis,
    pub value: f64,
}

/// POST /api/session - Start a fresh form.
pub async fn create(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let id = Uuid::new_v4();
    let session = Session::new();
    let form = session.form.view();

    state.sessions.write().await.insert(id, session);
    tracing::debug!(session = %id, "session created");

    Json(SessionResponse {
        id: id.to_string(),
        form,
    })
}

/// GET /api/session/:id - Current form.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FormView>, HandlerError> {
    let id = parse_session_id(&id)?;
    Ok(Json(with_form(&state, id, |form| form.view()).await?))
}

/// PUT /api/session/:id/text - Replace the text.
pub async fn set_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> Result<Json<FormView>, HandlerError> {
    let id = parse_session_id(&id)?;
    let view = with_form(&state, id, |form| {
        form.set_text(body.text);
        form.view()
    })
    .await?;
    Ok(Json(view))
}

/// PUT /api/session/:id/logo-scale - Move a logo slider.
pub async fn set_logo_scale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<LogoScaleRequest>,
) -> Result<Json<FormView>, HandlerError> {
    let id = parse_session_id(&id)?;
    if !(0.0..=LOGO_SLIDER_MAX).contains(&body.value) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Slider value must be between 0 and {}", LOGO_SLIDER_MAX),
        ));
    }
    let view = with_form(&state, id, |form| {
        form.set_logo_scale(body.axis, body.value);
        form.view()
    })
    .await?;
    Ok(Json(view))
}

/// POST /api/session/:id/logo - Select a logo file (multipart field `logo`).
///
/// The file is recorded right away; decoding runs in the background and
/// lands on the form whenever it finishes.
pub async fn upload_logo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HandlerError> {
    let id = parse_session_id(&id)?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("logo") {
            let name = field.file_name().unwrap_or("unknown").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read logo: {}", e)))?;
            file = Some(LogoFile::new(name, bytes.to_vec()));
            break;
        }
    }
    let file = file.ok_or((StatusCode::BAD_REQUEST, "No logo field found".to_string()))?;

    let (job, view) = with_form(&state, id, |form| {
        let job = form.select_file(file);
        (job, form.view())
    })
    .await?;

    let decoding = job.is_some();
    if let Some(job) = job {
        tokio::spawn(decode_in_background(state.clone(), id, job));
    }

    Ok((StatusCode::ACCEPTED, Json(UploadResponse { decoding, form: view })))
}

/// Run a decode job off the async runtime and apply it to the session, if
/// the session still exists.
async fn decode_in_background(state: Arc<AppState>, id: Uuid, job: DecodeJob) {
    let filename = job.filename().to_string();
    let outcome = match tokio::task::spawn_blocking(move || job.run()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(session = %id, filename = %filename, "decode task failed: {}", e);
            return;
        }
    };

    let mut sessions = state.sessions.write().await;
    match sessions.get_mut(&id) {
        Some(session) => session.form.complete_decode(outcome),
        None => tracing::debug!(session = %id, "session gone before logo decode finished"),
    }
}

/// POST /api/session/:id/generate - Validate and render.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GenerateResponse>, HandlerError> {
    let id = parse_session_id(&id)?;
    let (ok, form) = with_form(&state, id, |form| {
        let ok = form.validate_and_render().is_ok();
        (ok, form.view())
    })
    .await?;
    Ok(Json(GenerateResponse { ok, form }))
}

/// POST /api/session/:id/reset - Clear the form.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FormView>, HandlerError> {
    let id = parse_session_id(&id)?;
    let view = with_form(&state, id, |form| {
        form.reset();
        form.view()
    })
    .await?;
    Ok(Json(view))
}
