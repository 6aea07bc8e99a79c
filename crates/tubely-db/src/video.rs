use async_trait::async_trait;
use sqlx::PgPool;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

use crate::traits::VideoStore;

#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn create_video(&self, video: &VideoRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(video_id = %video.id, error = %e, "Failed to create video");
            AppError::Database(e)
        })?;

        tracing::info!(video_id = %video.id, user_id = %video.user_id, "Created video record");
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let video = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(video_id = %id, error = %e, "Failed to fetch video");
            AppError::Database(e)
        })?;

        Ok(video)
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                thumbnail_url = $4,
                video_url = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(video_id = %video.id, error = %e, "Failed to update video");
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        Ok(())
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let videos = sqlx::query_as::<_, VideoRecord>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Failed to list videos");
            AppError::Database(e)
        })?;

        Ok(videos)
    }
}
