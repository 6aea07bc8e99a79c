//! Upload pipeline state machine.
//!
//! A run moves through
//! `Received -> Buffered -> Probed -> Remuxed -> Classified -> KeyDerived ->
//! Published -> RecordUpdated`, or stops in `Failed(stage, cause)`. Every
//! staged file is removed before `run` returns, whatever the outcome.
//!
//! There is no retry, and nothing is rolled back once the object is
//! published: a record update that fails after `Published` leaves the object
//! in the bucket and reports `MetadataUpdate`.

use crate::traits::MediaToolkit;
use crate::upload::error::{PipelineError, PipelineFailure, PipelineStage};
use crate::upload::ingress::buffer_upload;
use crate::upload::staging::StagingArea;
use crate::video::{aspect_ratio_label, classify, remux_output_path};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;
use tubely_core::constants::VIDEO_CONTENT_TYPE;
use tubely_core::{AspectClass, PipelineConfig, VideoRecord};
use tubely_db::VideoStore;
use tubely_storage::{derive_video_key, Storage};
use uuid::Uuid;

/// One inbound upload, already authenticated.
pub struct UploadRequest<R> {
    pub video_id: Uuid,
    pub user_id: Uuid,
    /// Declared media type of the uploaded part.
    pub content_type: String,
    pub body: R,
}

/// States a successful run passes through, with the data each produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Received,
    Buffered { bytes: u64 },
    Probed { aspect_ratio: &'static str },
    Remuxed,
    Classified(AspectClass),
    KeyDerived { key: String },
    Published { bucket: String, key: String },
    RecordUpdated,
}

impl PipelineState {
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineState::Received => PipelineStage::Received,
            PipelineState::Buffered { .. } => PipelineStage::Buffered,
            PipelineState::Probed { .. } => PipelineStage::Probed,
            PipelineState::Remuxed => PipelineStage::Remuxed,
            PipelineState::Classified(_) => PipelineStage::Classified,
            PipelineState::KeyDerived { .. } => PipelineStage::KeyDerived,
            PipelineState::Published { .. } => PipelineStage::Published,
            PipelineState::RecordUpdated => PipelineStage::RecordUpdated,
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutcome {
    /// The record as written by the final update.
    pub video: VideoRecord,
    pub transitions: Vec<PipelineState>,
}

pub struct UploadPipeline {
    config: PipelineConfig,
    toolkit: Arc<dyn MediaToolkit>,
    storage: Arc<dyn Storage>,
    videos: Arc<dyn VideoStore>,
}

/// Mutable bookkeeping for one run.
struct RunState {
    staging: StagingArea,
    transitions: Vec<PipelineState>,
    attempting: PipelineStage,
}

impl RunState {
    fn attempt(&mut self, stage: PipelineStage) {
        self.attempting = stage;
    }

    fn advance(&mut self, state: PipelineState) {
        tracing::debug!(stage = %state.stage(), "Pipeline stage completed");
        self.transitions.push(state);
    }

    fn fail(&self, failure: PipelineFailure) -> PipelineError {
        PipelineError::new(self.attempting, failure)
    }
}

impl UploadPipeline {
    pub fn new(
        config: PipelineConfig,
        toolkit: Arc<dyn MediaToolkit>,
        storage: Arc<dyn Storage>,
        videos: Arc<dyn VideoStore>,
    ) -> Self {
        Self {
            config,
            toolkit,
            storage,
            videos,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Drive one upload to `RecordUpdated` or to a failure.
    ///
    /// Staged files are removed before this returns. If the returned future is
    /// dropped instead, they are removed on drop.
    #[tracing::instrument(skip_all, fields(video_id = %request.video_id, user_id = %request.user_id))]
    pub async fn run<R>(&self, request: UploadRequest<R>) -> Result<PipelineOutcome, PipelineError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let start = Instant::now();
        let mut run = RunState {
            staging: StagingArea::new(&self.config.staging_dir),
            transitions: Vec::new(),
            attempting: PipelineStage::Received,
        };

        let finished = match self.config.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.execute(request, &mut run))
                .await
                .ok(),
            None => Some(self.execute(request, &mut run).await),
        };
        let result = match finished {
            Some(result) => result,
            None => Err(run.fail(PipelineFailure::Cancelled {
                deadline_ms: self.config.deadline.unwrap_or_default().as_millis(),
            })),
        };

        run.staging.release_all();

        let duration_ms = start.elapsed().as_millis();
        match result {
            Ok(video) => {
                tracing::info!(duration_ms = duration_ms, "Upload pipeline completed");
                Ok(PipelineOutcome {
                    video,
                    transitions: run.transitions,
                })
            }
            Err(e) => {
                if e.is_client_error() {
                    tracing::debug!(stage = %e.stage, error = %e, "Upload rejected");
                } else {
                    tracing::error!(
                        stage = %e.stage,
                        error = %e,
                        duration_ms = duration_ms,
                        "Upload pipeline failed"
                    );
                }
                Err(e)
            }
        }
    }

    async fn execute<R>(
        &self,
        request: UploadRequest<R>,
        run: &mut RunState,
    ) -> Result<VideoRecord, PipelineError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let UploadRequest {
            video_id,
            user_id,
            content_type,
            body,
        } = request;

        // Lookup, ownership, then content type; all before a byte is staged.
        run.attempt(PipelineStage::Received);
        let mut video = self
            .videos
            .get_video(video_id)
            .await
            .map_err(|e| run.fail(PipelineFailure::MetadataLookup(e)))?
            .ok_or_else(|| run.fail(PipelineFailure::NotFound(video_id)))?;
        if !video.is_owned_by(user_id) {
            return Err(run.fail(PipelineFailure::Forbidden { video_id, user_id }));
        }
        if !is_mp4(&content_type) {
            return Err(run.fail(PipelineFailure::UnsupportedContentType(content_type)));
        }
        run.advance(PipelineState::Received);

        run.attempt(PipelineStage::Buffered);
        let (ingress_path, bytes) =
            buffer_upload(body, &mut run.staging, self.config.max_upload_bytes)
                .await
                .map_err(|e| run.fail(e.into()))?;
        run.advance(PipelineState::Buffered { bytes });

        run.attempt(PipelineStage::Probed);
        let dimensions = self
            .toolkit
            .probe(&ingress_path)
            .await
            .map_err(|e| run.fail(PipelineFailure::Probe(e)))?;
        let aspect_ratio = aspect_ratio_label(dimensions, self.config.aspect_ratio_tolerance);
        run.advance(PipelineState::Probed { aspect_ratio });

        run.attempt(PipelineStage::Remuxed);
        // Tracked before the tool runs so a partial output is removed too.
        run.staging
            .adopt(remux_output_path(&ingress_path))
            .map_err(|e| run.fail(PipelineFailure::Io(e)))?;
        let remuxed_path = self
            .toolkit
            .remux(&ingress_path)
            .await
            .map_err(|e| run.fail(PipelineFailure::Remux(e)))?;
        run.staging
            .adopt(remuxed_path.clone())
            .map_err(|e| run.fail(PipelineFailure::Io(e)))?;
        if let Err(e) = run.staging.release(&ingress_path) {
            tracing::warn!(error = %e, "Failed to remove superseded ingress file");
        }
        run.advance(PipelineState::Remuxed);

        run.attempt(PipelineStage::Classified);
        let class = classify(aspect_ratio);
        run.advance(PipelineState::Classified(class));

        run.attempt(PipelineStage::KeyDerived);
        let key = derive_video_key(class);
        run.advance(PipelineState::KeyDerived { key: key.clone() });

        run.attempt(PipelineStage::Published);
        let stored = self
            .storage
            .put_file(&key, &remuxed_path, VIDEO_CONTENT_TYPE)
            .await
            .map_err(|e| run.fail(PipelineFailure::Publish(e)))?;
        run.advance(PipelineState::Published {
            bucket: stored.bucket.clone(),
            key: stored.key.clone(),
        });

        run.attempt(PipelineStage::RecordUpdated);
        video.video_url = Some(stored.url);
        video.updated_at = Utc::now();
        if let Err(error) = self.videos.update_video(&video).await {
            tracing::error!(
                bucket = %stored.bucket,
                key = %stored.key,
                error = %error,
                "Video published but record update failed; object left in place"
            );
            return Err(run.fail(PipelineFailure::MetadataUpdate {
                key: stored.key,
                error,
            }));
        }
        run.advance(PipelineState::RecordUpdated);

        Ok(video)
    }
}

/// Accepts `video/mp4`, ignoring case and parameters.
fn is_mp4(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(VIDEO_CONTENT_TYPE))
}
