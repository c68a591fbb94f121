// crates/framestrip-core/src/lib.rs
//
// Pure data and pure logic — no ffmpeg, no I/O, no threads.
// framestrip-media implements the MediaSource seam and drives runs;
// this crate owns everything that can be tested without a video file.

pub mod error;
pub mod generation;
pub mod helpers;
pub mod preview_types;
pub mod sampling;
pub mod source;
pub mod state;
pub mod viewport;

// Re-export the types that cross the crate boundary on every call so
// downstream imports stay shallow.
pub use error::PreviewError;
pub use generation::GenerationCounter;
pub use preview_types::{FolderEntry, PreviewEvent, VideoFrame, VideoInfo};
pub use sampling::{plan_timestamps, SamplingPolicy};
pub use source::MediaSource;
pub use state::PreviewState;
pub use viewport::ViewportTracker;
