//! Tubely database layer: video metadata persistence.

pub mod traits;
pub mod video;

pub use traits::VideoStore;
pub use video::VideoRepository;
