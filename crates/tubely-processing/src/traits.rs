//! Capability interface over external media tooling.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Width and height of the first video stream, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// width / height as a decimal.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Media inspection and container rewriting.
///
/// The production implementation shells out to ffprobe/ffmpeg; tests
/// substitute a scripted double.
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Report the dimensions of the first video stream.
    async fn probe(&self, path: &Path) -> anyhow::Result<VideoDimensions>;

    /// Rewrite the container for progressive playback without touching samples.
    ///
    /// Writes to [`crate::video::remux_output_path`] of `path` and returns that
    /// path. The input is left in place.
    async fn remux(&self, path: &Path) -> anyhow::Result<PathBuf>;
}
