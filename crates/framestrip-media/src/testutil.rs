// crates/framestrip-media/src/testutil.rs
//
// Scripted MediaSource for worker and engine tests. Probe and listing
// answer instantly from fixed data; extraction can signal entry and block
// on a gate so tests can interleave runs deterministically.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};

use framestrip_core::error::PreviewError;
use framestrip_core::preview_types::{PreviewEvent, VideoFrame, VideoInfo};
use framestrip_core::source::MediaSource;

pub(crate) struct MockSource {
    pub duration_secs: f64,
    /// First byte of every produced frame payload, for telling two runs'
    /// frames apart in assertions.
    pub frame_tag: u8,
    pub list: Vec<PathBuf>,
    pub probe_errors: HashSet<PathBuf>,
    pub extract_error_at: Option<u32>,
    /// Signals every extract_frame entry, before any blocking.
    pub entered_tx: Option<Sender<()>>,
    /// When present, every extract_frame blocks until one token arrives.
    pub gate_rx: Option<Receiver<()>>,
    /// Every extraction request, in call order: (path, timestamp, index).
    pub calls: Mutex<Vec<(PathBuf, f64, u32)>>,
}

impl MockSource {
    pub fn with_duration(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            frame_tag: 0,
            list: Vec::new(),
            probe_errors: HashSet::new(),
            extract_error_at: None,
            entered_tx: None,
            gate_rx: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn tagged(mut self, tag: u8) -> Self {
        self.frame_tag = tag;
        self
    }

    fn info(&self) -> VideoInfo {
        VideoInfo {
            duration_secs: self.duration_secs,
            file_size_bytes: 1 << 20,
            width: Some(1280),
            height: Some(720),
            display_aspect_ratio: Some("16:9".into()),
            codec: Some("h264".into()),
            bitrate: Some(1_500_000),
            framerate: Some("25.00".into()),
        }
    }
}

impl MediaSource for MockSource {
    fn probe_info(&self, path: &Path) -> Result<VideoInfo, PreviewError> {
        if self.probe_errors.contains(path) {
            return Err(PreviewError::Probe(format!(
                "unreadable container: {}",
                path.display()
            )));
        }
        Ok(self.info())
    }

    fn extract_frame(
        &self,
        path: &Path,
        timestamp_secs: f64,
        index: u32,
    ) -> Result<VideoFrame, PreviewError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), timestamp_secs, index));
        if let Some(tx) = &self.entered_tx {
            let _ = tx.send(());
        }
        if let Some(rx) = &self.gate_rx {
            let _ = rx.recv();
        }
        if self.extract_error_at == Some(index) {
            return Err(PreviewError::Extract {
                timestamp_secs,
                msg: "mock decode failure".into(),
            });
        }
        Ok(VideoFrame {
            index,
            timestamp_secs,
            data: vec![self.frame_tag, index as u8],
        })
    }

    fn list_video_files(&self, _folder: &Path) -> Result<Vec<PathBuf>, PreviewError> {
        Ok(self.list.clone())
    }
}

/// Collect everything currently buffered on the event channel.
pub(crate) fn drain(rx: &Receiver<PreviewEvent>) -> Vec<PreviewEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}
