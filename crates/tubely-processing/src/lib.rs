//! Tubely Processing Library
//!
//! The upload pipeline: staging of the inbound stream, geometry probing,
//! faststart remuxing, classification, key derivation, publication and the
//! final record update.

pub mod traits;
pub mod upload;
pub mod video;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use traits::{MediaToolkit, VideoDimensions};
pub use upload::{
    PipelineError, PipelineFailure, PipelineOutcome, PipelineStage, PipelineState, UploadPipeline,
    UploadRequest,
};
pub use video::{aspect_ratio_label, classify, FfmpegToolkit};
