use crate::auth::AuthUser;
use crate::constants::VIDEO_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, missing_field, multipart_error, parse_video_id};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use futures::TryStreamExt;
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use tubely_core::VideoRecord;
use tubely_processing::UploadRequest;

/// Upload the video file for an existing draft.
///
/// The multipart part is streamed straight into the pipeline; nothing is
/// buffered in memory.
#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/upload",
    tag = "videos",
    params(("video_id" = String, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video processed and published", body = VideoRecord),
        (status = 400, description = "Invalid ID or unsupported content type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Processing or publish failure", body = ErrorResponse),
        (status = 504, description = "Processing deadline exceeded", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    // Rejects strangers before the body is read; the pipeline checks again.
    load_owned_video(&state, video_id, user.user_id).await?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let body = StreamReader::new(field.map_err(io::Error::other));

        let outcome = state
            .pipeline
            .run(UploadRequest {
                video_id,
                user_id: user.user_id,
                content_type,
                body,
            })
            .await?;

        return Ok(Json(outcome.video));
    }

    Err(missing_field(VIDEO_FIELD))
}
