// crates/framestrip-core/src/preview_types.rs
//
// Types that flow across the channel between framestrip-media run threads
// and the engine's state. No ffmpeg, no I/O handles — just plain data.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Probed metadata for one video file. Produced once per run per file and
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub duration_secs: f64,
    pub file_size_bytes: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Reduced `w:h` string, e.g. `"16:9"`.
    pub display_aspect_ratio: Option<String>,
    pub codec: Option<String>,
    /// Bits per second.
    pub bitrate: Option<u64>,
    /// Human-readable frames per second, e.g. `"29.97"`.
    pub framerate: Option<String>,
}

/// One extracted preview frame.
///
/// `index` matches the frame's position in the planned timestamp sequence
/// for its run; within one file's results frames are strictly ordered by it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoFrame {
    pub index: u32,
    pub timestamp_secs: f64,
    /// Encoded image bytes (PNG). Opaque to the engine.
    pub data: Vec<u8>,
}

/// Per-file result slot in a folder run.
///
/// `frames` grows append-only while the run is current; once `error` is set
/// no further frames are accepted for the entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub file_path: PathBuf,
    /// Path relative to the requested folder, used as the stable entry key.
    pub relative_path: String,
    pub info: Option<VideoInfo>,
    pub frames: Vec<VideoFrame>,
    pub error: Option<String>,
}

/// Results sent from a run thread to the engine.
///
/// Every variant carries the generation id of the run that produced it;
/// the engine drops events whose id is no longer current before they
/// reach `PreviewState::apply`.
#[derive(Clone, Debug)]
pub enum PreviewEvent {
    /// Single-file mode: probed metadata for the target.
    Info { id: u64, info: VideoInfo },
    /// Single-file mode: how many frames the planner scheduled.
    TotalPlanned { id: u64, count: usize },
    /// Single-file mode: one extracted frame, in planner order.
    Frame { id: u64, frame: VideoFrame },
    /// Folder mode: a fresh entry was appended for `file_path`.
    EntryStarted {
        id: u64,
        file_path: PathBuf,
        relative_path: String,
    },
    /// Folder mode: probe result for the entry at `index`.
    EntryInfo { id: u64, index: usize, info: VideoInfo },
    /// Folder mode: one extracted frame for the entry at `index`.
    EntryFrame {
        id: u64,
        index: usize,
        frame: VideoFrame,
    },
    /// Folder mode: the entry at `index` failed; its siblings continue.
    EntryError { id: u64, index: usize, msg: String },
    /// Top-level run failure (probe/extract in single mode, listing or an
    /// empty folder in folder mode).
    Failed { id: u64, msg: String },
    /// Terminal marker — the only event that flips `loading` off.
    Finished { id: u64 },
}

impl PreviewEvent {
    /// The generation that produced this event.
    pub fn generation(&self) -> u64 {
        match *self {
            PreviewEvent::Info { id, .. }
            | PreviewEvent::TotalPlanned { id, .. }
            | PreviewEvent::Frame { id, .. }
            | PreviewEvent::EntryStarted { id, .. }
            | PreviewEvent::EntryInfo { id, .. }
            | PreviewEvent::EntryFrame { id, .. }
            | PreviewEvent::EntryError { id, .. }
            | PreviewEvent::Failed { id, .. }
            | PreviewEvent::Finished { id } => id,
        }
    }
}
