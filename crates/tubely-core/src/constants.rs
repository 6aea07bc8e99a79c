//! Application-wide constants.

/// Largest accepted video upload (1 GiB).
pub const MAX_VIDEO_UPLOAD_BYTES: u64 = 1 << 30;

/// Largest accepted thumbnail upload (10 MiB).
pub const MAX_THUMBNAIL_UPLOAD_BYTES: u64 = 10 << 20;

/// The only container format the upload pipeline accepts.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extension appended to every published video key.
pub const VIDEO_KEY_EXTENSION: &str = "mp4";

/// Key prefix for uploaded thumbnails.
pub const THUMBNAIL_KEY_PREFIX: &str = "thumbnails";

/// Default tolerance when matching a width/height ratio against 16/9 or 9/16.
pub const DEFAULT_ASPECT_RATIO_TOLERANCE: f64 = 0.01;

/// Default lifetime of presigned read URLs, in seconds.
pub const DEFAULT_PRESIGNED_URL_TTL_SECS: u64 = 3600;

/// Number of random bytes behind every storage key suffix (256 bits).
pub const STORAGE_KEY_ENTROPY_BYTES: usize = 32;
