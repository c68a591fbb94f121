// crates/framestrip-media/src/lib.rs
//
// FFmpeg-backed collaborators plus the run engine. No rendering here —
// hosts talk to PreviewEngine through commands and read PreviewState back.
//
// To add a new media capability:
//   1. Create a new module file here
//   2. Add `mod mymodule;` below
//   3. Wire it into FfmpegSource (or a new MediaSource impl)

pub mod cache;
pub mod engine;
pub mod extract;
pub mod ffmpeg_source;
pub mod listing;
pub mod probe;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export the main public API so host imports are simple.
pub use cache::FrameCache;
pub use engine::PreviewEngine;
pub use ffmpeg_source::FfmpegSource;
pub use framestrip_core::{
    FolderEntry, GenerationCounter, MediaSource, PreviewError, PreviewEvent, PreviewState,
    SamplingPolicy, VideoFrame, VideoInfo, ViewportTracker,
};
