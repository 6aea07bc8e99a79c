use crate::upload::ingress::IngressError;
use std::fmt;
use thiserror::Error;
use tubely_core::AppError;
use tubely_storage::StorageError;
use uuid::Uuid;

/// Pipeline stages, named after the state a stage leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    Buffered,
    Probed,
    Remuxed,
    Classified,
    KeyDerived,
    Published,
    RecordUpdated,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Buffered => "buffered",
            PipelineStage::Probed => "probed",
            PipelineStage::Remuxed => "remuxed",
            PipelineStage::Classified => "classified",
            PipelineStage::KeyDerived => "key_derived",
            PipelineStage::Published => "published",
            PipelineStage::RecordUpdated => "record_updated",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineFailure {
    #[error("unsupported content type {0:?}, expected video/mp4")]
    UnsupportedContentType(String),

    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("video {0} not found")]
    NotFound(Uuid),

    #[error("user {user_id} does not own video {video_id}")]
    Forbidden { video_id: Uuid, user_id: Uuid },

    #[error("video lookup failed: {0}")]
    MetadataLookup(AppError),

    #[error("staging I/O failed: {0}")]
    Io(std::io::Error),

    #[error("probe failed: {0:#}")]
    Probe(anyhow::Error),

    #[error("remux failed: {0:#}")]
    Remux(anyhow::Error),

    #[error("publish failed: {0}")]
    Publish(StorageError),

    #[error("record update failed after publishing {key}: {error}")]
    MetadataUpdate { key: String, error: AppError },

    #[error("pipeline exceeded its {deadline_ms} ms deadline")]
    Cancelled { deadline_ms: u128 },
}

impl From<IngressError> for PipelineFailure {
    fn from(err: IngressError) -> Self {
        match err {
            IngressError::PayloadTooLarge { limit } => PipelineFailure::PayloadTooLarge { limit },
            IngressError::Io(e) => PipelineFailure::Io(e),
        }
    }
}

/// Terminal `Failed(stage, cause)` state of a pipeline run.
///
/// `stage` is the stage that was being attempted when the run stopped.
#[derive(Debug, Error)]
#[error("upload failed at {stage}: {failure}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub failure: PipelineFailure,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, failure: PipelineFailure) -> Self {
        Self { stage, failure }
    }

    /// Rejections caused by the request rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.failure,
            PipelineFailure::UnsupportedContentType(_)
                | PipelineFailure::PayloadTooLarge { .. }
                | PipelineFailure::NotFound(_)
                | PipelineFailure::Forbidden { .. }
        )
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let stage = err.stage;
        match err.failure {
            PipelineFailure::UnsupportedContentType(content_type) => AppError::InvalidInput(
                format!("Unsupported content type '{content_type}'. Only video/mp4 is accepted"),
            ),
            PipelineFailure::PayloadTooLarge { limit } => {
                AppError::PayloadTooLarge(format!("Video exceeds the maximum size of {limit} bytes"))
            }
            PipelineFailure::NotFound(_) => AppError::NotFound("Video not found".to_string()),
            PipelineFailure::Forbidden { .. } => {
                AppError::Forbidden("You do not own this video".to_string())
            }
            PipelineFailure::MetadataLookup(e) => e,
            PipelineFailure::Io(e) => AppError::Internal(format!("Failed to stage upload: {e}")),
            PipelineFailure::Probe(e) => {
                AppError::MediaProcessing(format!("Could not read video geometry: {e:#}"))
            }
            PipelineFailure::Remux(e) => {
                AppError::MediaProcessing(format!("Could not prepare video for streaming: {e:#}"))
            }
            PipelineFailure::Publish(e) => AppError::S3(format!("Failed to publish video: {e}")),
            PipelineFailure::MetadataUpdate { key, error } => AppError::MetadataUpdate(format!(
                "Video stored at '{key}' but the record was not updated: {error}"
            )),
            PipelineFailure::Cancelled { deadline_ms } => AppError::Timeout(format!(
                "Upload processing exceeded {deadline_ms} ms during the {stage} stage"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_display_names_stage() {
        let err = PipelineError::new(
            PipelineStage::Probed,
            PipelineFailure::Probe(anyhow::anyhow!("moov atom not found")),
        );
        let msg = err.to_string();
        assert!(msg.contains("probed"));
        assert!(msg.contains("moov atom not found"));
    }

    #[test]
    fn test_client_errors() {
        let forbidden = PipelineError::new(
            PipelineStage::Received,
            PipelineFailure::Forbidden {
                video_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            },
        );
        assert!(forbidden.is_client_error());

        let publish = PipelineError::new(
            PipelineStage::Published,
            PipelineFailure::Publish(StorageError::UploadFailed("503".to_string())),
        );
        assert!(!publish.is_client_error());
    }

    #[test]
    fn test_conversion_to_app_error_status_codes() {
        let cases = [
            (
                PipelineFailure::UnsupportedContentType("video/quicktime".to_string()),
                400,
            ),
            (PipelineFailure::PayloadTooLarge { limit: 10 }, 413),
            (PipelineFailure::NotFound(Uuid::new_v4()), 404),
            (
                PipelineFailure::Forbidden {
                    video_id: Uuid::new_v4(),
                    user_id: Uuid::new_v4(),
                },
                403,
            ),
            (PipelineFailure::Cancelled { deadline_ms: 5 }, 504),
            (
                PipelineFailure::Publish(StorageError::UploadFailed("x".to_string())),
                500,
            ),
        ];

        for (failure, status) in cases {
            let app: AppError = PipelineError::new(PipelineStage::Received, failure).into();
            assert_eq!(app.http_status_code(), status, "{app}");
        }
    }

    #[test]
    fn test_metadata_update_keeps_key_in_message() {
        let app: AppError = PipelineError::new(
            PipelineStage::RecordUpdated,
            PipelineFailure::MetadataUpdate {
                key: "landscape/abc.mp4".to_string(),
                error: AppError::Internal("connection reset".to_string()),
            },
        )
        .into();
        assert!(matches!(app, AppError::MetadataUpdate(_)));
        assert!(app.to_string().contains("landscape/abc.mp4"));
    }
}
