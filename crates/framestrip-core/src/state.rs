// crates/framestrip-core/src/state.rs
//
// The externally observable preview state. Run threads never touch this
// directly — they emit PreviewEvents, and the engine applies them here
// after the generation gate. apply() is therefore the single writer of
// every result field.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::preview_types::{FolderEntry, PreviewEvent, VideoFrame, VideoInfo};
use crate::sampling::SamplingPolicy;

/// State cell bundle read by the rendering host.
///
/// Lifecycle: created empty and inactive; reset to a fresh shape at the
/// start of every run (including a rerun of the same target); mutated
/// incrementally by the current run only; cleared on explicit close.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreviewState {
    pub active: bool,
    /// True for the entire run, including all per-file sub-steps. Only the
    /// current generation's terminal event flips it back off.
    pub loading: bool,
    pub error: Option<String>,
    /// The configured sampling policy. Survives `clear()` so the next run
    /// reuses the last selection.
    pub policy: SamplingPolicy,

    // ── Single-file mode ─────────────────────────────────────────────────
    pub current_path: Option<PathBuf>,
    pub info: Option<VideoInfo>,
    pub frames: Vec<VideoFrame>,
    pub total_planned: usize,

    // ── Folder mode ──────────────────────────────────────────────────────
    pub folder_mode: bool,
    pub folder_path: Option<PathBuf>,
    pub folder_entries: Vec<FolderEntry>,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            active: false,
            loading: false,
            error: None,
            policy: SamplingPolicy::FixedCount { count: 9 },
            current_path: None,
            info: None,
            frames: Vec::new(),
            total_planned: 0,
            folder_mode: false,
            folder_path: None,
            folder_entries: Vec::new(),
        }
    }
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh shape for a single-file run targeting `path`.
    pub fn reset_for_single(&mut self, path: PathBuf) {
        self.active = true;
        self.loading = true;
        self.error = None;
        self.current_path = Some(path);
        self.info = None;
        self.frames.clear();
        self.total_planned = 0;
        self.folder_mode = false;
        self.folder_path = None;
        self.folder_entries.clear();
    }

    /// Fresh shape for a folder run targeting `folder`.
    pub fn reset_for_folder(&mut self, folder: PathBuf) {
        self.active = true;
        self.loading = true;
        self.error = None;
        self.current_path = None;
        self.info = None;
        self.frames.clear();
        self.total_planned = 0;
        self.folder_mode = true;
        self.folder_path = Some(folder);
        self.folder_entries.clear();
    }

    /// Back to the empty/inactive shape. The policy is preserved.
    pub fn clear(&mut self) {
        let policy = self.policy;
        *self = Self {
            policy,
            ..Self::default()
        };
    }

    /// Apply one event from the current run.
    ///
    /// Callers must gate on generation currency first — this method trusts
    /// that the event belongs to the run that owns the state right now.
    pub fn apply(&mut self, event: PreviewEvent) {
        match event {
            PreviewEvent::Info { info, .. } => self.info = Some(info),
            PreviewEvent::TotalPlanned { count, .. } => self.total_planned = count,
            PreviewEvent::Frame { frame, .. } => self.frames.push(frame),
            PreviewEvent::EntryStarted {
                file_path,
                relative_path,
                ..
            } => self.folder_entries.push(FolderEntry {
                file_path,
                relative_path,
                info: None,
                frames: Vec::new(),
                error: None,
            }),
            PreviewEvent::EntryInfo { index, info, .. } => {
                if let Some(entry) = self.folder_entries.get_mut(index) {
                    entry.info = Some(info);
                }
            }
            PreviewEvent::EntryFrame { index, frame, .. } => {
                if let Some(entry) = self.folder_entries.get_mut(index) {
                    // An errored entry accepts no further frames.
                    if entry.error.is_none() {
                        entry.frames.push(frame);
                    }
                }
            }
            PreviewEvent::EntryError { index, msg, .. } => {
                if let Some(entry) = self.folder_entries.get_mut(index) {
                    entry.error = Some(msg);
                }
            }
            PreviewEvent::Failed { msg, .. } => self.error = Some(msg),
            PreviewEvent::Finished { .. } => self.loading = false,
        }
    }
}
