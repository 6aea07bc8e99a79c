use crate::auth::AuthUser;
use crate::constants::{THUMBNAIL_FIELD, THUMBNAIL_TYPES};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, missing_field, multipart_error, parse_video_id};
use crate::state::AppState;
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tubely_core::{AppError, VideoRecord};
use tubely_storage::derive_thumbnail_key;

/// Map a declared media type to the stored (content type, extension) pair.
fn thumbnail_type(content_type: &str) -> Option<(&'static str, &'static str)> {
    let essence = content_type.split(';').next()?.trim();
    THUMBNAIL_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .copied()
}

async fn read_limited(mut field: Field<'_>, max_bytes: u64) -> Result<Vec<u8>, HttpAppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if (data.len() + chunk.len()) as u64 > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds the maximum size of {} bytes",
                max_bytes
            ))
            .into());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Upload a thumbnail image for a video the caller owns.
#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/thumbnail",
    tag = "videos",
    params(("video_id" = String, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = VideoRecord),
        (status = 400, description = "Invalid ID or unsupported image type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let mut video = load_owned_video(&state, video_id, user.user_id).await?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let declared = field.content_type().unwrap_or_default().to_string();
        let (content_type, extension) = thumbnail_type(&declared).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Unsupported thumbnail type '{}'. Use image/png or image/jpeg",
                declared
            ))
        })?;

        let data = read_limited(field, state.config.max_thumbnail_size_bytes()).await?;
        if data.is_empty() {
            return Err(AppError::InvalidInput("Thumbnail is empty".to_string()).into());
        }
        let size_bytes = data.len();

        let key = derive_thumbnail_key(extension);
        let stored = state.storage.put_bytes(&key, data, content_type).await?;

        video.thumbnail_url = Some(stored.url);
        video.updated_at = Utc::now();
        state.videos.update_video(&video).await?;

        tracing::info!(
            video_id = %video.id,
            key = %stored.key,
            size_bytes = size_bytes,
            "Thumbnail uploaded"
        );

        return Ok(Json(video));
    }

    Err(missing_field(THUMBNAIL_FIELD))
}
