//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Multipart field carrying the video body.
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Headroom above a file limit for multipart boundaries and part headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Accepted thumbnail media types and the extension each is stored under.
pub const THUMBNAIL_TYPES: &[(&str, &str)] = &[("image/png", "png"), ("image/jpeg", "jpg")];
