pub mod health;
pub mod thumbnail_upload;
pub mod video_create;
pub mod video_get;
pub mod video_upload;

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::multipart::MultipartError;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

/// Parse a path segment as a video id, rejecting with 400.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, HttpAppError> {
    Uuid::parse_str(raw)
        .map_err(|_| HttpAppError(AppError::InvalidInput(format!("Invalid video ID '{}'", raw))))
}

/// Load a video and check that `user_id` owns it.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<VideoRecord, HttpAppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Forbidden("You do not own this video".to_string()).into());
    }

    Ok(video)
}

pub(crate) fn multipart_error(err: MultipartError) -> HttpAppError {
    HttpAppError(AppError::BadRequest(format!(
        "Invalid multipart body: {}",
        err.body_text()
    )))
}

pub(crate) fn missing_field(name: &str) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!(
        "Missing multipart field '{}'",
        name
    )))
}
