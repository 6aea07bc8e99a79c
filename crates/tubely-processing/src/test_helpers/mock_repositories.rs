//! Mock repository implementations for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tubely_core::{AppError, VideoRecord};
use tubely_db::VideoStore;
use uuid::Uuid;

/// In-memory video store
#[derive(Clone, Default)]
pub struct MockVideoStore {
    videos: Arc<Mutex<HashMap<Uuid, VideoRecord>>>,
    fail_updates: Arc<AtomicBool>,
    update_calls: Arc<AtomicUsize>,
}

impl MockVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(video: VideoRecord) -> Self {
        let store = Self::new();
        store.insert(video);
        store
    }

    pub fn insert(&self, video: VideoRecord) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    /// Current stored copy (for test assertions)
    pub fn get(&self, id: Uuid) -> Option<VideoRecord> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    /// Make every subsequent `update_video` fail.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoStore for MockVideoStore {
    async fn create_video(&self, video: &VideoRecord) -> Result<(), AppError> {
        self.insert(video.clone());
        Ok(())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<(), AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated database outage".to_string()));
        }

        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let mut videos: Vec<VideoRecord> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}
