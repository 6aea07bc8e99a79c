//! Test helpers: build AppState and router over in-memory doubles.
//!
//! Run from workspace root: `cargo test -p tubely-api`. No database, bucket or
//! ffmpeg install is needed.

#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::{AppState, ErrorResponse};
use tubely_core::constants::{
    DEFAULT_ASPECT_RATIO_TOLERANCE, MAX_THUMBNAIL_UPLOAD_BYTES, MAX_VIDEO_UPLOAD_BYTES,
};
use tubely_core::{BaseConfig, Config, StorageBackend, TubelyConfig, VideoRecord};
use tubely_processing::test_helpers::{
    draft_video, FakeToolkit, MockStorage, MockVideoStore,
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-32-plus-chars";

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage: Arc<MockStorage>,
    pub videos: Arc<MockVideoStore>,
    pub toolkit: Arc<FakeToolkit>,
    pub staging: TempDir,
}

pub fn test_config(staging_dir: &Path) -> TubelyConfig {
    TubelyConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
            log_json: false,
        },
        database_url: "postgres://unused@localhost/unused".to_string(),
        storage_backend: Some(StorageBackend::S3),
        s3_bucket: Some("tubely-test".to_string()),
        s3_region: Some("us-east-1".to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        presigned_url_ttl_secs: 3600,
        max_video_size_bytes: MAX_VIDEO_UPLOAD_BYTES,
        max_thumbnail_size_bytes: MAX_THUMBNAIL_UPLOAD_BYTES,
        staging_dir: staging_dir.to_path_buf(),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        aspect_ratio_tolerance: DEFAULT_ASPECT_RATIO_TOLERANCE,
        pipeline_deadline_secs: None,
    }
}

/// Test app whose fake toolkit reports a 1920x1080 stream.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeToolkit::new(1920, 1080), |_| {})
}

pub fn setup_test_app_with(
    toolkit: FakeToolkit,
    configure: impl FnOnce(&mut TubelyConfig),
) -> TestApp {
    let staging = tempfile::tempdir().expect("staging dir");
    let mut tubely_config = test_config(staging.path());
    configure(&mut tubely_config);
    let config = Config(Box::new(tubely_config));

    let storage = Arc::new(MockStorage::new());
    let videos = Arc::new(MockVideoStore::new());
    let toolkit = Arc::new(toolkit);

    let state = Arc::new(AppState::new(
        config.clone(),
        videos.clone(),
        storage.clone(),
        toolkit.clone(),
    ));
    let router = routes::setup_routes(&config, state.clone()).expect("router");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        state,
        storage,
        videos,
        toolkit,
        staging,
    }
}

impl TestApp {
    pub fn bearer(&self, user_id: Uuid) -> String {
        let token = self
            .state
            .jwt
            .issue_token(user_id, chrono::Duration::hours(1))
            .expect("token");
        format!("Bearer {}", token)
    }

    /// Insert a draft owned by `owner` directly into the store.
    pub fn seed_video(&self, owner: Uuid) -> VideoRecord {
        let video = draft_video(owner);
        self.videos.insert(video.clone());
        video
    }

    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn upload_video(
        &self,
        user_id: Uuid,
        video_id: &str,
        form: MultipartForm,
    ) -> TestResponse {
        self.server
            .post(&format!("/api/videos/{}/upload", video_id))
            .add_header("Authorization", self.bearer(user_id))
            .multipart(form)
            .await
    }
}

pub fn video_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(data).file_name("clip.mp4").mime_type(mime),
    )
}

pub fn thumbnail_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(data).file_name("thumb").mime_type(mime),
    )
}

/// Assert status and return the parsed error body.
pub fn expect_error(response: &TestResponse, status: StatusCode) -> ErrorResponse {
    response.assert_status(status);
    response.json::<ErrorResponse>()
}
