//! Test helpers for pipeline and API tests
//!
//! In-memory implementations of Storage and VideoStore plus a scripted media
//! toolkit, so the pipeline can run without ffmpeg, a bucket or a database.

pub mod fake_toolkit;
pub mod fixtures;
pub mod mock_repositories;
pub mod mock_storage;

pub use fake_toolkit::FakeToolkit;
pub use fixtures::*;
pub use mock_repositories::MockVideoStore;
pub use mock_storage::{MockStorage, StoredBlob, MOCK_BUCKET};

use crate::upload::UploadPipeline;
use std::path::Path;
use std::sync::Arc;
use tubely_core::PipelineConfig;

/// Build a pipeline over the given doubles, staging into `staging_dir`.
pub fn create_test_pipeline(
    staging_dir: &Path,
    toolkit: Arc<FakeToolkit>,
    storage: Arc<MockStorage>,
    videos: Arc<MockVideoStore>,
) -> UploadPipeline {
    UploadPipeline::new(PipelineConfig::new(staging_dir), toolkit, storage, videos)
}

/// Number of entries left in a staging directory.
pub fn staged_file_count(staging_dir: &Path) -> usize {
    std::fs::read_dir(staging_dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}
