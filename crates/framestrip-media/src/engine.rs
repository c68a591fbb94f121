// crates/framestrip-media/src/engine.rs
//
// PreviewEngine: the host-facing facade. Commands mint generations and
// spawn run threads; poll() drains the event channel into PreviewState,
// dropping anything from a superseded run before it can touch state.
// PreviewState therefore has exactly one writer — the thread that owns
// the engine — regardless of how many stale run threads are still
// winding down.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};

use framestrip_core::error::PreviewError;
use framestrip_core::generation::GenerationCounter;
use framestrip_core::preview_types::PreviewEvent;
use framestrip_core::sampling::SamplingPolicy;
use framestrip_core::source::{is_video_file, MediaSource};
use framestrip_core::state::PreviewState;
use framestrip_core::viewport::ViewportTracker;

use crate::worker;

pub struct PreviewEngine {
    source: Arc<dyn MediaSource>,
    generation: Arc<GenerationCounter>,
    state: PreviewState,
    viewport: ViewportTracker,
    tx: Sender<PreviewEvent>,
    rx: Receiver<PreviewEvent>,
    /// Handle of the most recently spawned run. Replaced (and thereby
    /// detached) when a new run begins — a superseded thread needs no
    /// supervision, its next generation check ends it.
    run: Option<thread::JoinHandle<()>>,
}

impl PreviewEngine {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            generation: Arc::new(GenerationCounter::new()),
            state: PreviewState::new(),
            viewport: ViewportTracker::new(),
            tx,
            rx,
            run: None,
        }
    }

    /// The observable state bundle. Call `poll()` first to fold in any
    /// pending results.
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.state.policy
    }

    /// Configure the sampling policy for subsequent runs. Invalid
    /// parameters are rejected here, before any run can observe them.
    pub fn set_policy(&mut self, policy: SamplingPolicy) -> Result<(), PreviewError> {
        policy.validate()?;
        self.state.policy = policy;
        Ok(())
    }

    /// Start a single-file run, superseding whatever was in flight.
    pub fn generate_single(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let id = self.generation.begin();
        log::debug!("[engine] gen {id} single ← {}", path.display());
        self.state.reset_for_single(path.clone());
        self.viewport.reset();
        self.spawn_run(move |source, policy, generation, tx| {
            worker::run_single(source, &path, policy, id, generation, tx)
        });
    }

    /// Start a folder run, superseding whatever was in flight.
    pub fn generate_folder(&mut self, folder: impl Into<PathBuf>) {
        let folder = folder.into();
        let id = self.generation.begin();
        log::debug!("[engine] gen {id} folder ← {}", folder.display());
        self.state.reset_for_folder(folder.clone());
        self.viewport.reset();
        self.spawn_run(move |source, policy, generation, tx| {
            worker::run_batch(source, &folder, policy, id, generation, tx)
        });
    }

    /// Replay the current mode and target under the currently configured
    /// policy, as a fresh generation.
    pub fn regenerate(&mut self) {
        if self.state.folder_mode {
            if let Some(folder) = self.state.folder_path.clone() {
                self.generate_folder(folder);
            }
        } else if let Some(path) = self.state.current_path.clone() {
            self.generate_single(path);
        }
    }

    /// Cancel anything in flight (no replacement) and drop back to the
    /// empty/inactive shape.
    pub fn close(&mut self) {
        let id = self.generation.begin();
        log::debug!("[engine] gen {id} close");
        self.state.clear();
        self.viewport.reset();
        self.run = None;
    }

    /// Selection auto-trigger: when preview is active in single-file mode
    /// and a different video file becomes selected, start a run for it.
    /// Just another caller of `generate_single` — the usual supersession
    /// rules apply, nothing stronger.
    pub fn on_selection_changed(&mut self, selected: Option<&Path>) {
        let Some(path) = selected else { return };
        if !self.state.active || self.state.folder_mode {
            return;
        }
        if self.state.current_path.as_deref() == Some(path) {
            return;
        }
        if !is_video_file(path) {
            return;
        }
        self.generate_single(path.to_path_buf());
    }

    /// Drain pending run events into state. Events from superseded
    /// generations are discarded, never merged. Returns how many events
    /// were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            if !self.generation.is_current(event.generation()) {
                continue;
            }
            self.state.apply(event);
            applied += 1;
        }
        applied
    }

    // ── Viewport tracking ────────────────────────────────────────────────

    /// Register a rendered entry for visibility tracking. Idempotent.
    pub fn observe_entry(&mut self, entry_id: &str) -> bool {
        self.viewport.observe(entry_id)
    }

    /// Host-reported visibility change for a registered entry.
    pub fn record_intersection(&mut self, entry_id: &str, intersecting: bool, extent: u32) {
        self.viewport.record_intersection(entry_id, intersecting, extent);
    }

    pub fn is_entry_visible(&self, entry_id: &str) -> bool {
        self.viewport.is_visible(entry_id)
    }

    pub fn placeholder_extent(&self, entry_id: &str) -> u32 {
        self.viewport.placeholder_extent(entry_id)
    }

    fn spawn_run<F>(&mut self, body: F)
    where
        F: FnOnce(&dyn MediaSource, SamplingPolicy, &GenerationCounter, &Sender<PreviewEvent>)
            + Send
            + 'static,
    {
        let source = Arc::clone(&self.source);
        let generation = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let policy = self.state.policy;
        self.run = Some(thread::spawn(move || {
            body(source.as_ref(), policy, &generation, &tx)
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockSource;
    use std::path::PathBuf;

    fn engine_with(source: MockSource) -> PreviewEngine {
        PreviewEngine::new(Arc::new(source))
    }

    /// Join the current run thread, then fold its events into state.
    fn finish(engine: &mut PreviewEngine) {
        if let Some(handle) = engine.run.take() {
            handle.join().unwrap();
        }
        engine.poll();
    }

    #[test]
    fn single_run_end_to_end() {
        let mut engine = engine_with(MockSource::with_duration(100.0));
        engine.generate_single("/v/a.mp4");
        assert!(engine.state().loading);
        assert!(engine.state().active);

        finish(&mut engine);

        let state = engine.state();
        assert!(!state.loading);
        assert_eq!(state.total_planned, 9);
        assert_eq!(state.frames.len(), 9);
        assert!((state.frames[0].timestamp_secs - 10.0).abs() < 1e-9);
        assert!((state.frames[8].timestamp_secs - 90.0).abs() < 1e-9);
        assert!(state.info.is_some());
    }

    #[test]
    fn regenerate_with_new_policy_reflects_it() {
        let mut engine = engine_with(MockSource::with_duration(150.0));
        engine
            .set_policy(SamplingPolicy::Interval { minutes: 1.0 })
            .unwrap();
        engine.generate_single("/v/a.mp4");
        finish(&mut engine);
        let timestamps: Vec<f64> = engine
            .state()
            .frames
            .iter()
            .map(|f| f.timestamp_secs)
            .collect();
        assert_eq!(timestamps, vec![60.0, 120.0]);

        // Change the policy while idle, then replay the same target.
        engine
            .set_policy(SamplingPolicy::FixedCount { count: 16 })
            .unwrap();
        engine.regenerate();
        finish(&mut engine);

        let state = engine.state();
        assert_eq!(state.frames.len(), 16);
        assert_eq!(state.total_planned, 16);
        // No leftovers from the interval run.
        let step = 150.0 / 17.0;
        for (i, frame) in state.frames.iter().enumerate() {
            assert!((frame.timestamp_secs - step * (i as f64 + 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_policy_is_rejected_up_front() {
        let mut engine = engine_with(MockSource::with_duration(100.0));
        let err = engine
            .set_policy(SamplingPolicy::Interval { minutes: 0.0 })
            .unwrap_err();
        assert!(matches!(err, PreviewError::Policy(_)));
        // The configured policy is unchanged.
        assert_eq!(engine.policy(), SamplingPolicy::FixedCount { count: 9 });
    }

    #[test]
    fn folder_run_end_to_end() {
        let mut source = MockSource::with_duration(40.0);
        source.list = vec![PathBuf::from("/v/a.mp4"), PathBuf::from("/v/sub/b.mp4")];
        let mut engine = engine_with(source);
        engine.generate_folder("/v");
        finish(&mut engine);

        let state = engine.state();
        assert!(state.folder_mode);
        assert_eq!(state.folder_entries.len(), 2);
        assert_eq!(state.folder_entries[1].relative_path, "sub/b.mp4");
        assert!(state.folder_entries.iter().all(|e| e.error.is_none()));
        assert!(!state.loading);
    }

    #[test]
    fn stale_events_are_dropped_by_the_gate() {
        let mut engine = engine_with(MockSource::with_duration(100.0));
        engine.generate_single("/v/a.mp4");
        finish(&mut engine);
        assert_eq!(engine.state().frames.len(), 9);

        // Forge a late event from a dead generation and make sure poll
        // refuses it.
        engine
            .tx
            .send(PreviewEvent::Failed {
                id: 0,
                msg: "late".into(),
            })
            .unwrap();
        assert_eq!(engine.poll(), 0);
        assert!(engine.state().error.is_none());
    }

    #[test]
    fn close_resets_to_inactive() {
        let mut engine = engine_with(MockSource::with_duration(100.0));
        engine.generate_single("/v/a.mp4");
        finish(&mut engine);
        engine.close();

        let state = engine.state();
        assert!(!state.active);
        assert!(!state.loading);
        assert!(state.current_path.is_none());
        assert!(state.frames.is_empty());
    }

    #[test]
    fn selection_triggers_only_when_preconditions_hold() {
        let mut engine = engine_with(MockSource::with_duration(100.0));

        // Inactive: no run.
        engine.on_selection_changed(Some(Path::new("/v/a.mp4")));
        assert!(!engine.state().active);
        assert_eq!(engine.generation.current(), 0);

        engine.generate_single("/v/a.mp4");
        finish(&mut engine);

        // Same path: no new generation.
        let before = engine.generation.current();
        engine.on_selection_changed(Some(Path::new("/v/a.mp4")));
        assert_eq!(engine.generation.current(), before);

        // Non-video: ignored.
        engine.on_selection_changed(Some(Path::new("/v/readme.txt")));
        assert_eq!(engine.generation.current(), before);

        // Different video: a fresh run targeting it.
        engine.on_selection_changed(Some(Path::new("/v/b.mp4")));
        assert!(engine.generation.current() > before);
        assert_eq!(
            engine.state().current_path.as_deref(),
            Some(Path::new("/v/b.mp4"))
        );
        finish(&mut engine);
        assert_eq!(engine.state().frames.len(), 9);
    }

    #[test]
    fn selection_is_ignored_in_folder_mode() {
        let mut source = MockSource::with_duration(40.0);
        source.list = vec![PathBuf::from("/v/a.mp4")];
        let mut engine = engine_with(source);
        engine.generate_folder("/v");
        finish(&mut engine);

        let before = engine.generation.current();
        engine.on_selection_changed(Some(Path::new("/v/a.mp4")));
        assert_eq!(engine.generation.current(), before);
        assert!(engine.state().folder_mode);
    }

    #[test]
    fn new_run_resets_viewport_bookkeeping() {
        let mut source = MockSource::with_duration(40.0);
        source.list = vec![PathBuf::from("/v/a.mp4")];
        let mut engine = engine_with(source);
        engine.generate_folder("/v");
        finish(&mut engine);

        engine.observe_entry("a.mp4");
        engine.record_intersection("a.mp4", false, 240);
        assert!(!engine.is_entry_visible("a.mp4"));

        engine.regenerate();
        assert!(engine.is_entry_visible("a.mp4"));
        assert_eq!(
            engine.placeholder_extent("a.mp4"),
            framestrip_core::viewport::DEFAULT_PLACEHOLDER_EXTENT
        );
        finish(&mut engine);
    }
}
