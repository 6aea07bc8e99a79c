//! Storage key derivation.
//!
//! Video keys are `{class}/{suffix}.mp4`; thumbnail keys are
//! `thumbnails/{suffix}.{ext}`. The suffix is drawn fresh for every call, so a
//! failed attempt never leaves a key behind for reuse.

use crate::traits::{StorageError, StorageResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use tubely_core::constants::{STORAGE_KEY_ENTROPY_BYTES, THUMBNAIL_KEY_PREFIX, VIDEO_KEY_EXTENSION};
use tubely_core::AspectClass;

/// 256 bits from the thread-local CSPRNG, base64url without padding (43 chars).
pub fn random_suffix() -> String {
    let mut bytes = [0u8; STORAGE_KEY_ENTROPY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Derive a fresh key for a published video of the given class.
pub fn derive_video_key(class: AspectClass) -> String {
    format!(
        "{}/{}.{}",
        class.as_prefix(),
        random_suffix(),
        VIDEO_KEY_EXTENSION
    )
}

/// Derive a fresh key for a thumbnail with the given file extension.
pub fn derive_thumbnail_key(extension: &str) -> String {
    format!("{}/{}.{}", THUMBNAIL_KEY_PREFIX, random_suffix(), extension)
}

/// Reject keys that could escape the bucket or base directory.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_suffix_is_url_safe_and_full_length() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 43);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_video_key_layout() {
        let key = derive_video_key(AspectClass::Landscape);
        assert!(key.starts_with("landscape/"));
        assert!(key.ends_with(".mp4"));
        assert!(validate_key(&key).is_ok());

        assert!(derive_video_key(AspectClass::Portrait).starts_with("portrait/"));
        assert!(derive_video_key(AspectClass::Other).starts_with("other/"));
    }

    #[test]
    fn test_thumbnail_key_layout() {
        let key = derive_thumbnail_key("png");
        assert!(key.starts_with("thumbnails/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_ten_thousand_keys_do_not_collide() {
        let keys: HashSet<String> = (0..10_000)
            .map(|_| derive_video_key(AspectClass::Landscape))
            .collect();
        assert_eq!(keys.len(), 10_000);
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(matches!(
            validate_key("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
    }
}
