//! Video processor - geometry probing via ffprobe

use crate::traits::VideoDimensions;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Reject shell metacharacters and traversal in a configured binary path.
fn validate_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }

    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }

    Ok(())
}

/// Validate an executable path supplied through configuration.
pub(crate) fn validate_executable(path: &str, name: &str) -> Result<()> {
    validate_path(path).with_context(|| format!("Invalid {name} path"))?;

    if path.is_empty()
        || !path.chars().all(|c| {
            c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
        })
    {
        return Err(anyhow!("Invalid {} path: contains unsafe characters", name));
    }

    Ok(())
}

/// Resolve a staged media file to an absolute path.
///
/// Arguments go straight to the tool's argv, never through a shell, so any
/// directory name the operator picks for staging is accepted.
pub(crate) fn canonicalize_media_path(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

pub struct VideoProcessor {
    ffprobe_path: String,
}

impl VideoProcessor {
    pub fn new(ffprobe_path: String) -> Result<Self> {
        validate_executable(&ffprobe_path, "ffprobe")?;
        Ok(Self { ffprobe_path })
    }

    /// Read width and height of the first video stream.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe_dimensions(&self, video_path: &Path) -> Result<VideoDimensions> {
        let start = std::time::Instant::now();

        let validated_path =
            canonicalize_media_path(video_path).context("Invalid video path")?;

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(&validated_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}

/// Pull the first stream's dimensions out of ffprobe's JSON report.
pub(crate) fn parse_probe_output(stdout: &[u8]) -> Result<VideoDimensions> {
    let probe_data: serde_json::Value =
        serde_json::from_slice(stdout).context("Failed to parse ffprobe output")?;

    let stream = probe_data["streams"]
        .get(0)
        .ok_or_else(|| anyhow!("No video stream found"))?;

    let width = stream["width"]
        .as_u64()
        .ok_or_else(|| anyhow!("Could not parse width"))?;
    let height = stream["height"]
        .as_u64()
        .ok_or_else(|| anyhow!("Could not parse height"))?;

    let width = u32::try_from(width).context("Width out of range")?;
    let height = u32::try_from(height).context("Height out of range")?;

    if width == 0 || height == 0 {
        return Err(anyhow!("Video stream reports zero dimension {}x{}", width, height));
    }

    Ok(VideoDimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output_reads_first_stream() {
        let json = br#"{"streams":[{"index":0,"codec_name":"h264","width":1920,"height":1080}]}"#;
        let dims = parse_probe_output(json).unwrap();
        assert_eq!(dims, VideoDimensions::new(1920, 1080));
    }

    #[test]
    fn test_parse_probe_output_without_streams() {
        let err = parse_probe_output(br#"{"streams":[]}"#).unwrap_err();
        assert!(err.to_string().contains("No video stream"));
    }

    #[test]
    fn test_parse_probe_output_missing_height() {
        let err = parse_probe_output(br#"{"streams":[{"width":640}]}"#).unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_parse_probe_output_rejects_zero_dimensions() {
        assert!(parse_probe_output(br#"{"streams":[{"width":0,"height":720}]}"#).is_err());
    }

    #[test]
    fn test_parse_probe_output_rejects_garbage() {
        assert!(parse_probe_output(b"not json").is_err());
    }

    #[test]
    fn test_validate_path_rejects_metacharacters() {
        assert!(validate_path("/tmp/video.mp4").is_ok());
        assert!(validate_path("/tmp/video.mp4; rm -rf /").is_err());
        assert!(validate_path("/tmp/../etc/passwd").is_err());
    }

    #[test]
    fn test_canonicalize_accepts_staging_dir_with_spaces_and_parens() {
        let root = tempfile::tempdir().unwrap();
        let staging = root.path().join("uploads (staging) & more");
        std::fs::create_dir(&staging).unwrap();
        let file = staging.join("a.mp4");
        std::fs::write(&file, b"data").unwrap();

        let resolved = canonicalize_media_path(&file).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("uploads (staging) & more/a.mp4"));
    }

    #[test]
    fn test_canonicalize_missing_file_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        assert!(canonicalize_media_path(&root.path().join("missing.mp4")).is_err());
    }

    #[tokio::test]
    async fn test_probe_runs_tool_for_staging_dir_with_parens() {
        let root = tempfile::tempdir().unwrap();
        let staging = root.path().join("uploads (staging)");
        std::fs::create_dir(&staging).unwrap();
        let file = staging.join("a.mp4");
        std::fs::write(&file, b"data").unwrap();

        let processor = VideoProcessor::new("/nonexistent/tubely-ffprobe".to_string()).unwrap();
        let err = processor.probe_dimensions(&file).await.unwrap_err();
        assert!(
            err.to_string().contains("Failed to execute ffprobe"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn test_new_rejects_unsafe_executable() {
        assert!(VideoProcessor::new("ffprobe".to_string()).is_ok());
        assert!(VideoProcessor::new("/usr/bin/ffprobe".to_string()).is_ok());
        assert!(VideoProcessor::new("ffprobe --help".to_string()).is_err());
        assert!(VideoProcessor::new(String::new()).is_err());
    }
}
