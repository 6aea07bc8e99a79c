use tubely_core::VideoRecord;
use uuid::Uuid;

/// A draft video owned by `user_id`, with no playback URL yet.
pub fn draft_video(user_id: Uuid) -> VideoRecord {
    VideoRecord::new_draft(
        user_id,
        "Boots: a retrospective".to_string(),
        Some("Test upload".to_string()),
    )
}

/// Bytes that stand in for an MP4 body. The fake toolkit never parses them.
pub fn sample_mp4_bytes(len: usize) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len.max(data.len()), 0xAB);
    data
}
