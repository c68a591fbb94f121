// crates/framestrip-media/src/worker.rs
//
// Run bodies executed on a spawned thread, one per generation. The only
// cancellation mechanism is the generation check: before every blocking
// collaborator call and again after it returns. A superseded run finishes
// its one in-flight call, then stops publishing and stops issuing work —
// it never flips state for the run that replaced it.

use std::path::Path;

use crossbeam_channel::Sender;

use framestrip_core::error::PreviewError;
use framestrip_core::generation::GenerationCounter;
use framestrip_core::preview_types::PreviewEvent;
use framestrip_core::sampling::{plan_timestamps, SamplingPolicy};
use framestrip_core::source::MediaSource;

/// Error shown when a folder run finds nothing to do.
pub(crate) const NO_VIDEOS_FOUND: &str = "No video files found in this folder";

/// Single-file run: probe, plan, then extract strictly in order, publishing
/// each frame as it lands.
pub(crate) fn run_single(
    source: &dyn MediaSource,
    path: &Path,
    policy: SamplingPolicy,
    id: u64,
    generation: &GenerationCounter,
    tx: &Sender<PreviewEvent>,
) {
    if !generation.is_current(id) {
        return;
    }

    let info = match source.probe_info(path) {
        Ok(info) => info,
        Err(e) => return fail(id, e, generation, tx),
    };
    if !generation.is_current(id) {
        return;
    }
    let duration_secs = info.duration_secs;
    let _ = tx.send(PreviewEvent::Info { id, info });

    let timestamps = match plan_timestamps(duration_secs, policy) {
        Ok(ts) => ts,
        Err(e) => return fail(id, e, generation, tx),
    };
    let _ = tx.send(PreviewEvent::TotalPlanned {
        id,
        count: timestamps.len(),
    });

    for (i, &ts) in timestamps.iter().enumerate() {
        if !generation.is_current(id) {
            return;
        }
        match source.extract_frame(path, ts, i as u32) {
            Ok(frame) => {
                // Cancellation may have landed while the extraction ran.
                if !generation.is_current(id) {
                    return;
                }
                let _ = tx.send(PreviewEvent::Frame { id, frame });
            }
            Err(e) => return fail(id, e, generation, tx),
        }
    }

    if generation.is_current(id) {
        log::debug!("[run] gen {id} finished {} frames", timestamps.len());
        let _ = tx.send(PreviewEvent::Finished { id });
    }
}

/// Folder run: list, then run the single-file pipeline against each entry's
/// own slot. A failing entry stores its error and the loop moves on; only
/// listing failures (or an empty listing) touch the top level.
pub(crate) fn run_batch(
    source: &dyn MediaSource,
    folder: &Path,
    policy: SamplingPolicy,
    id: u64,
    generation: &GenerationCounter,
    tx: &Sender<PreviewEvent>,
) {
    if !generation.is_current(id) {
        return;
    }

    let files = match source.list_video_files(folder) {
        Ok(files) => files,
        Err(e) => return fail(id, e, generation, tx),
    };
    if !generation.is_current(id) {
        return;
    }
    if files.is_empty() {
        let _ = tx.send(PreviewEvent::Failed {
            id,
            msg: NO_VIDEOS_FOUND.to_string(),
        });
        let _ = tx.send(PreviewEvent::Finished { id });
        return;
    }

    for (index, file_path) in files.iter().enumerate() {
        if !generation.is_current(id) {
            return;
        }
        let relative_path = file_path
            .strip_prefix(folder)
            .unwrap_or(file_path)
            .to_string_lossy()
            .to_string();
        let _ = tx.send(PreviewEvent::EntryStarted {
            id,
            file_path: file_path.clone(),
            relative_path,
        });

        if !run_batch_entry(source, file_path, policy, id, index, generation, tx) {
            // Superseded mid-entry: stop immediately, no terminal event.
            return;
        }
    }

    if generation.is_current(id) {
        log::debug!("[run] gen {id} finished batch of {}", files.len());
        let _ = tx.send(PreviewEvent::Finished { id });
    }
}

/// One entry of a folder run. Returns false when the run was superseded
/// (stop everything), true when the entry settled — either fully extracted
/// or failed on its own — and the batch should continue.
fn run_batch_entry(
    source: &dyn MediaSource,
    path: &Path,
    policy: SamplingPolicy,
    id: u64,
    index: usize,
    generation: &GenerationCounter,
    tx: &Sender<PreviewEvent>,
) -> bool {
    let info = match source.probe_info(path) {
        Ok(info) => info,
        Err(e) => {
            if !generation.is_current(id) {
                return false;
            }
            let _ = tx.send(PreviewEvent::EntryError {
                id,
                index,
                msg: e.to_string(),
            });
            return true;
        }
    };
    if !generation.is_current(id) {
        return false;
    }
    let duration_secs = info.duration_secs;
    let _ = tx.send(PreviewEvent::EntryInfo { id, index, info });

    let timestamps = match plan_timestamps(duration_secs, policy) {
        Ok(ts) => ts,
        Err(e) => {
            let _ = tx.send(PreviewEvent::EntryError {
                id,
                index,
                msg: e.to_string(),
            });
            return true;
        }
    };

    for (i, &ts) in timestamps.iter().enumerate() {
        if !generation.is_current(id) {
            return false;
        }
        match source.extract_frame(path, ts, i as u32) {
            Ok(frame) => {
                if !generation.is_current(id) {
                    return false;
                }
                let _ = tx.send(PreviewEvent::EntryFrame { id, index, frame });
            }
            Err(e) => {
                if !generation.is_current(id) {
                    return false;
                }
                let _ = tx.send(PreviewEvent::EntryError {
                    id,
                    index,
                    msg: e.to_string(),
                });
                return true;
            }
        }
    }
    true
}

/// Terminal failure for the top level of a run. Publishes only while the
/// run is still current — a superseded run fails silently.
fn fail(id: u64, error: PreviewError, generation: &GenerationCounter, tx: &Sender<PreviewEvent>) {
    if !generation.is_current(id) {
        return;
    }
    log::debug!("[run] gen {id} failed: {error}");
    let _ = tx.send(PreviewEvent::Failed {
        id,
        msg: error.to_string(),
    });
    let _ = tx.send(PreviewEvent::Finished { id });
}
