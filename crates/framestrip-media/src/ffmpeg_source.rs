// crates/framestrip-media/src/ffmpeg_source.rs
//
// The production MediaSource: in-process FFmpeg probe + extraction,
// recursive listing, optional frame cache in front of extraction.

use std::path::{Path, PathBuf};
use std::sync::Once;

use ffmpeg_the_third as ffmpeg;

use framestrip_core::error::PreviewError;
use framestrip_core::preview_types::{VideoFrame, VideoInfo};
use framestrip_core::source::MediaSource;

use crate::cache::{modified_stamp, FrameCache};
use crate::{extract, listing, probe};

static FFMPEG_INIT: Once = Once::new();

fn ensure_ffmpeg() {
    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg::init() {
            log::error!("[media] ffmpeg init failed: {e}");
        }
    });
}

pub struct FfmpegSource {
    cache: Option<FrameCache>,
}

impl FfmpegSource {
    pub fn new() -> Self {
        ensure_ffmpeg();
        Self { cache: None }
    }

    /// Source with a frame cache consulted before every extraction.
    pub fn with_cache(cache: FrameCache) -> Self {
        ensure_ffmpeg();
        Self { cache: Some(cache) }
    }
}

impl Default for FfmpegSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSource for FfmpegSource {
    fn probe_info(&self, path: &Path) -> Result<VideoInfo, PreviewError> {
        probe::probe_info(path)
    }

    fn extract_frame(
        &self,
        path: &Path,
        timestamp_secs: f64,
        index: u32,
    ) -> Result<VideoFrame, PreviewError> {
        let key = path.to_string_lossy();
        let stamp = self.cache.as_ref().and_then(|_| modified_stamp(path));

        if let (Some(cache), Some(stamp)) = (&self.cache, &stamp) {
            if let Some(data) = cache.get(&key, stamp, timestamp_secs) {
                log::debug!("[cache] hit at {timestamp_secs:.1}s ← {}", path.display());
                return Ok(VideoFrame {
                    index,
                    timestamp_secs,
                    data,
                });
            }
        }

        let frame = extract::extract_frame(path, timestamp_secs, index)?;

        if let (Some(cache), Some(stamp)) = (&self.cache, &stamp) {
            cache.store(&key, stamp, timestamp_secs, &frame.data);
        }
        Ok(frame)
    }

    fn list_video_files(&self, folder: &Path) -> Result<Vec<PathBuf>, PreviewError> {
        listing::list_video_files(folder)
    }
}
