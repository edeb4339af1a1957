//! Session route handlers.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use geosight_core::{
    intake::{is_image_media_type, normalize_media_type, UNKNOWN_MEDIA_TYPE},
    select_image, AnalysisStatus, ImageFile, Session, SessionEvent,
};
use tracing::{error, info, warn};

use crate::state::AppState;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// GET /api/session - Current session snapshot.
pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.snapshot().await)
}

/// POST /api/image - Select a new image.
///
/// Non-images are rejected with 415, empty files with 400. Either way the
/// session is left untouched.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Session>, (StatusCode, String)> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field.content_type().unwrap_or(UNKNOWN_MEDIA_TYPE).to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        file = Some(ImageFile::new(name, mime_type, bytes.to_vec()));
        break;
    }

    let file = file.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Missing multipart field '{}'", IMAGE_FIELD),
        )
    })?;

    let rejection = if is_image_media_type(&normalize_media_type(&file.mime_type)) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    };
    let image = select_image(file).map_err(|e| {
        warn!(error = %e, "Image rejected");
        (rejection, e.to_string())
    })?;

    Ok(Json(state.apply(SessionEvent::ImageSelected(image)).await))
}

/// POST /api/analyze - Analyze the selected image.
///
/// Responds with the resulting snapshot; a failed analysis is reported
/// through `status: "error"` with the preview still in place. The remote
/// call runs in its own task and always settles the session, even when
/// the client disconnects before the answer arrives.
pub async fn analyze(
    State(state): State<AppState>,
) -> Result<Json<Session>, (StatusCode, String)> {
    let (attempt, request) = {
        let mut session = state.session.write().await;
        if session.image.is_none() {
            return Err((StatusCode::BAD_REQUEST, "No image selected".to_string()));
        }
        if session.status == AnalysisStatus::Analyzing {
            return Err((
                StatusCode::CONFLICT,
                "An analysis is already in progress".to_string(),
            ));
        }
        *session = std::mem::take(&mut *session).reduce(SessionEvent::AnalyzeRequested);
        session.pending_request().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session did not enter the analyzing state".to_string(),
            )
        })?
    };

    info!(attempt, mime_type = %request.mime_type(), "Analysis started");
    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let event = match task_state.analyzer.analyze(request).await {
            Ok(result) => SessionEvent::AnalysisSucceeded { attempt, result },
            Err(e) => SessionEvent::AnalysisFailed {
                attempt,
                message: e.to_string(),
            },
        };

        let session = task_state.apply(event).await;
        info!(attempt, status = %session.status, "Analysis finished");
        session
    });

    let session = task.await.map_err(|e| {
        error!(attempt, error = %e, "Analysis task failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(session))
}

/// POST /api/reset - Start over.
pub async fn reset(State(state): State<AppState>) -> Json<Session> {
    Json(state.apply(SessionEvent::Reset).await)
}
