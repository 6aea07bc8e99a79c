use crate::traits::{MediaToolkit, VideoDimensions};
use crate::video::processor::VideoProcessor;
use crate::video::service::FFmpegService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// [`MediaToolkit`] backed by the ffprobe and ffmpeg executables.
pub struct FfmpegToolkit {
    processor: VideoProcessor,
    ffmpeg: FFmpegService,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        let processor =
            VideoProcessor::new(ffprobe_path).context("Failed to create VideoProcessor")?;
        let ffmpeg = FFmpegService::new(ffmpeg_path).context("Failed to create FFmpegService")?;
        Ok(Self { processor, ffmpeg })
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions> {
        self.processor.probe_dimensions(path).await
    }

    async fn remux(&self, path: &Path) -> Result<PathBuf> {
        self.ffmpeg.remux_faststart(path).await
    }
}
