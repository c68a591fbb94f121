// crates/framestrip-core/src/viewport.rs
//
// Viewport bookkeeping for long result lists. Folder batches can contain
// hundreds of entries; only the ones near the viewport are fully rendered,
// the rest become placeholders of their last measured size so the scroll
// offset never jumps.
//
// The tracker is layout-engine agnostic: the host reports, per registered
// entry, "is it intersecting the tracked region" plus its current rendered
// extent, and reads back visibility and placeholder size.

use std::collections::{HashMap, HashSet};

/// Placeholder size reported for entries with no recorded measurement.
/// A tracked entry never detaches without one, so this only shows up for
/// queries about entries that are still fully rendered.
pub const DEFAULT_PLACEHOLDER_EXTENT: u32 = 200;

#[derive(Debug, Default)]
pub struct ViewportTracker {
    /// Registered entry ids. Registration is idempotent; intersection
    /// reports for unregistered ids are ignored.
    observed: HashSet<String>,
    /// Entries currently represented by a placeholder.
    detached: HashSet<String>,
    /// Last extent measured while the entry was actually rendered.
    /// Detached entries keep theirs — that is the whole point.
    extents: HashMap<String, u32>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry for visibility tracking. Returns `true` the first
    /// time an id is seen, `false` on repeat calls (already observed).
    pub fn observe(&mut self, entry_id: &str) -> bool {
        self.observed.insert(entry_id.to_string())
    }

    /// Host-reported visibility transition for one entry.
    ///
    /// On leaving the viewport, a positive extent is recorded *before* the
    /// entry is marked detached; an entry with no recorded extent is never
    /// detached, because it has to render at least once for a correctly
    /// sized placeholder to exist.
    pub fn record_intersection(&mut self, entry_id: &str, intersecting: bool, extent: u32) {
        if !self.observed.contains(entry_id) {
            return;
        }
        if intersecting {
            self.detached.remove(entry_id);
        } else {
            if extent > 0 {
                self.extents.insert(entry_id.to_string(), extent);
            }
            if self.extents.contains_key(entry_id) {
                self.detached.insert(entry_id.to_string());
            }
        }
    }

    /// True unless the entry is explicitly detached.
    pub fn is_visible(&self, entry_id: &str) -> bool {
        !self.detached.contains(entry_id)
    }

    /// The remembered extent for a detached entry's placeholder.
    pub fn placeholder_extent(&self, entry_id: &str) -> u32 {
        self.extents
            .get(entry_id)
            .copied()
            .unwrap_or(DEFAULT_PLACEHOLDER_EXTENT)
    }

    /// Drop all tracked entries and remembered extents. Called whenever a
    /// new run begins — a new result set invalidates all prior bookkeeping.
    pub fn reset(&mut self) {
        self.observed.clear();
        self.detached.clear();
        self.extents.clear();
    }
}
