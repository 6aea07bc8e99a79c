//! FFmpegService - container rewriting for progressive playback.

use crate::video::processor::{canonicalize_media_path, validate_executable};
use anyhow::{anyhow, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const REMUX_SUFFIX: &str = ".processing";

/// `{input}.processing`, next to the input.
pub fn remux_output_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(REMUX_SUFFIX);
    PathBuf::from(path)
}

#[derive(Clone)]
pub struct FFmpegService {
    ffmpeg_path: String,
}

impl FFmpegService {
    pub fn new(ffmpeg_path: String) -> Result<Self> {
        validate_executable(&ffmpeg_path, "ffmpeg")?;
        Ok(Self { ffmpeg_path })
    }

    /// Stream-copy `input_path` into an MP4 with the index moved to the front.
    ///
    /// Returns the path of the new file. The input is never removed here.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "remux_faststart"
    ))]
    pub async fn remux_faststart(&self, input_path: &Path) -> Result<PathBuf> {
        let start = std::time::Instant::now();

        let input = canonicalize_media_path(input_path).context("Invalid video path")?;
        let output_path = remux_output_path(input_path);

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .args(["-v", "error", "-i"])
            .arg(&input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "FFmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            return Err(anyhow!(
                "FFmpeg reported success but produced no output at {}",
                output_path.display()
            ));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Faststart remux completed"
        );

        Ok(output_path)
    }
}
