use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tubely_core::models::CreateVideoRequest;
use tubely_core::{AppError, VideoRecord};

const MAX_TITLE_LEN: usize = 200;

/// Create a draft video owned by the caller. The file is uploaded separately.
#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft created", body = VideoRecord),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoRecord>), HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        ))
        .into());
    }

    let video = VideoRecord::new_draft(user.user_id, title.to_string(), request.description);
    state.videos.create_video(&video).await?;

    tracing::info!(video_id = %video.id, user_id = %user.user_id, "Draft video created");
    Ok((StatusCode::CREATED, Json(video)))
}
