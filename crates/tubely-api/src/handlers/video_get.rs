use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, parse_video_id};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;
use tubely_core::VideoRecord;

/// Attach a time-limited GET URL when the playback URL points into our store.
async fn with_signed_url(state: &AppState, video: VideoRecord) -> VideoResponse {
    let Some(key) = video
        .video_url
        .as_deref()
        .and_then(|url| state.storage.key_from_url(url))
    else {
        return VideoResponse::from(video);
    };

    match state
        .storage
        .get_presigned_url(&key, state.config.presigned_url_ttl())
        .await
    {
        Ok(signed) => VideoResponse {
            video,
            signed_video_url: Some(signed),
        },
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "Failed to presign playback URL");
            VideoResponse::from(video)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(&state, video_id, user.user_id).await?;
    Ok(Json(with_signed_url(&state, video).await))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Videos owned by the caller, newest first", body = Vec<VideoResponse>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(user.user_id).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(with_signed_url(&state, video).await);
    }

    Ok(Json(responses))
}
