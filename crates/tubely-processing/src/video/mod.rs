pub mod aspect;
pub mod processor;
pub mod service;
pub mod toolkit;

pub use aspect::{aspect_ratio_label, classify};
pub use processor::VideoProcessor;
pub use service::{remux_output_path, FFmpegService};
pub use toolkit::FfmpegToolkit;
