// crates/framestrip-core/src/source.rs
//
// The collaborator seam. The engine only ever touches media through this
// trait; framestrip-media provides the ffmpeg-backed implementation and
// tests provide scripted ones.

use std::path::{Path, PathBuf};

use crate::error::PreviewError;
use crate::preview_types::{VideoFrame, VideoInfo};

/// Extensions treated as video files, both for folder listing and for the
/// selection auto-trigger.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "webm", "mov", "mpg", "mpeg"];

/// Case-insensitive extension check against [`VIDEO_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// The three blocking collaborator calls a run suspends on.
///
/// Implementations must be callable from a run thread; the engine never
/// issues two calls concurrently — extraction is strictly sequential by
/// design so a single decode backend is never oversubscribed.
pub trait MediaSource: Send + Sync {
    /// Probe duration and stream metadata for one file.
    fn probe_info(&self, path: &Path) -> Result<VideoInfo, PreviewError>;

    /// Extract a single frame at `timestamp_secs`. `index` is the frame's
    /// position in the planned sequence and is echoed back in the result.
    fn extract_frame(
        &self,
        path: &Path,
        timestamp_secs: f64,
        index: u32,
    ) -> Result<VideoFrame, PreviewError>;

    /// All video files under `folder`, recursively, in a stable order.
    fn list_video_files(&self, folder: &Path) -> Result<Vec<PathBuf>, PreviewError>;
}
