//! Tubely Storage Library
//!
//! Durable object storage for published videos and thumbnails, with an S3
//! backend (via `object_store`) and a local filesystem backend.
//!
//! # Storage key format
//!
//! - **Videos**: `{landscape|portrait|other}/{suffix}.mp4`
//! - **Thumbnails**: `thumbnails/{suffix}.{png|jpg}`
//!
//! The suffix is 256 random bits, base64url-encoded without padding. Keys must
//! not contain `..` or a leading `/`. Key generation lives in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{derive_thumbnail_key, derive_video_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
pub use tubely_core::StorageBackend;
