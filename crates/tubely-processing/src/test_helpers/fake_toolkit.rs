use crate::traits::{MediaToolkit, VideoDimensions};
use crate::video::remux_output_path;
use anyhow::anyhow;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted stand-in for ffprobe/ffmpeg.
///
/// A successful remux copies the input to `{input}.processing`. A failing
/// remux leaves a partial output behind, as a crashed ffmpeg would.
#[derive(Default)]
pub struct FakeToolkit {
    dimensions: Option<VideoDimensions>,
    fail_remux: bool,
    remux_delay: Option<Duration>,
    probe_calls: AtomicUsize,
    remux_calls: AtomicUsize,
}

impl FakeToolkit {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Some(VideoDimensions::new(width, height)),
            ..Default::default()
        }
    }

    /// A toolkit whose probe always fails.
    pub fn unreadable() -> Self {
        Self::default()
    }

    pub fn failing_remux(mut self) -> Self {
        self.fail_remux = true;
        self
    }

    /// Stall inside remux after writing partial output.
    pub fn with_remux_delay(mut self, delay: Duration) -> Self {
        self.remux_delay = Some(delay);
        self
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn remux_calls(&self) -> usize {
        self.remux_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaToolkit for FakeToolkit {
    async fn probe(&self, path: &Path) -> anyhow::Result<VideoDimensions> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if !path.exists() {
            return Err(anyhow!("{}: No such file or directory", path.display()));
        }
        self.dimensions
            .ok_or_else(|| anyhow!("Invalid data found when processing input"))
    }

    async fn remux(&self, path: &Path) -> anyhow::Result<PathBuf> {
        self.remux_calls.fetch_add(1, Ordering::SeqCst);
        let output = remux_output_path(path);

        if self.fail_remux || self.remux_delay.is_some() {
            tokio::fs::write(&output, b"partial moov").await?;
        }
        if let Some(delay) = self.remux_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_remux {
            return Err(anyhow!("FFmpeg exited with exit status: 1: muxer error"));
        }

        tokio::fs::copy(path, &output).await?;
        Ok(output)
    }
}
