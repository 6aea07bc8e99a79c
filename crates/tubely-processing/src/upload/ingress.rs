use crate::upload::staging::StagingArea;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

#[derive(Debug, Error)]
pub enum IngressError {
    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("failed to stage upload: {0}")]
    Io(#[from] io::Error),
}

/// Copy the inbound stream into a fresh staged file.
///
/// Reads at most `max_bytes + 1` bytes; a body of exactly `max_bytes` is
/// accepted. On error the partial file stays tracked by `staging`.
pub async fn buffer_upload<R>(
    reader: R,
    staging: &mut StagingArea,
    max_bytes: u64,
) -> Result<(PathBuf, u64), IngressError>
where
    R: AsyncRead + Unpin,
{
    let (mut file, path) = staging.create()?;

    let mut limited = reader.take(max_bytes.saturating_add(1));
    let written = tokio::io::copy(&mut limited, &mut file).await?;
    if written > max_bytes {
        return Err(IngressError::PayloadTooLarge { limit: max_bytes });
    }

    file.flush().await?;
    file.sync_all().await?;

    tracing::debug!(bytes = written, path = %path.display(), "Upload buffered");
    Ok((path, written))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffers_whole_body() {
        let dir = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::new(dir.path());

        let body = vec![7u8; 4096];
        let (path, bytes) = buffer_upload(body.as_slice(), &mut staging, 8192)
            .await
            .unwrap();

        assert_eq!(bytes, 4096);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_exact_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::new(dir.path());

        let body = vec![1u8; 1024];
        let (_, bytes) = buffer_upload(body.as_slice(), &mut staging, 1024)
            .await
            .unwrap();
        assert_eq!(bytes, 1024);
    }

    #[tokio::test]
    async fn test_one_byte_over_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::new(dir.path());

        let body = vec![1u8; 1025];
        let err = buffer_upload(body.as_slice(), &mut staging, 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, IngressError::PayloadTooLarge { limit: 1024 }));

        staging.release_all();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_staging_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut staging = StagingArea::new(dir.path().join("missing"));

        let err = buffer_upload(&b"abc"[..], &mut staging, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, IngressError::Io(_)));
    }
}
