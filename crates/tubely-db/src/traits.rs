//! Trait over video metadata storage.
//!
//! The upload pipeline and the API depend on this trait instead of the
//! Postgres repository so they can be exercised against an in-memory store.

use async_trait::async_trait;
use tubely_core::{AppError, VideoRecord};
use uuid::Uuid;

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a new record.
    async fn create_video(&self, video: &VideoRecord) -> Result<(), AppError>;

    /// Look up a record by id.
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Persist the mutable fields of an existing record.
    ///
    /// Returns `AppError::NotFound` when no row has the record's id.
    async fn update_video(&self, video: &VideoRecord) -> Result<(), AppError>;

    /// All records owned by a user, newest first.
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError>;
}
