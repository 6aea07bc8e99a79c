pub mod aspect;
pub mod video;

pub use aspect::AspectClass;
pub use video::{CreateVideoRequest, VideoRecord, VideoResponse};
