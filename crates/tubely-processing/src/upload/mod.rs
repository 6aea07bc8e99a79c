pub mod error;
pub mod ingress;
pub mod pipeline;
pub mod staging;

pub use error::{PipelineError, PipelineFailure, PipelineStage};
pub use ingress::{buffer_upload, IngressError};
pub use pipeline::{PipelineOutcome, PipelineState, UploadPipeline, UploadRequest};
pub use staging::StagingArea;
