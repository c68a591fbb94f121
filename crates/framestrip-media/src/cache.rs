// crates/framestrip-media/src/cache.rs
//
// On-disk frame cache. Extracting a frame costs a seek plus a decode;
// re-opening the same file with the same policy is common (close and
// reopen, policy toggled back, app restart), so encoded frames are kept
// in SQLite keyed by (path, mtime, timestamp). A file edit changes the
// mtime and silently invalidates all of its cached frames.

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::Connection;

pub struct FrameCache {
    conn: Mutex<Connection>,
}

impl FrameCache {
    /// Open (or create) the cache database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("open cache database {}", db_path.display()))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS frame_cache (
                file_path      TEXT NOT NULL,
                file_modified  TEXT NOT NULL,
                timestamp_secs REAL NOT NULL,
                frame_png      BLOB NOT NULL,
                PRIMARY KEY (file_path, file_modified, timestamp_secs)
            );",
        )
        .context("create frame_cache table")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the cache at its default per-user location.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "framestrip")
            .context("no home directory for the frame cache")?;
        Self::open(&dirs.data_dir().join("frame_cache.db"))
    }

    pub fn get(&self, path: &str, modified: &str, timestamp_secs: f64) -> Option<Vec<u8>> {
        self.conn
            .lock()
            .query_row(
                "SELECT frame_png FROM frame_cache
                 WHERE file_path = ?1 AND file_modified = ?2 AND timestamp_secs = ?3",
                rusqlite::params![path, modified, timestamp_secs],
                |row| row.get(0),
            )
            .ok()
    }

    /// Store one encoded frame. Failures are swallowed — the cache is an
    /// accelerator, never a correctness dependency.
    pub fn store(&self, path: &str, modified: &str, timestamp_secs: f64, data: &[u8]) {
        let _ = self.conn.lock().execute(
            "INSERT OR REPLACE INTO frame_cache
                 (file_path, file_modified, timestamp_secs, frame_png)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![path, modified, timestamp_secs, data],
        );
    }
}

/// Cache-key stamp for a file's current mtime, or None when the metadata
/// is unreadable (in which case callers skip the cache entirely).
pub fn modified_stamp(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let stamp = modified
        .duration_since(SystemTime::UNIX_EPOCH)
        .ok()?
        .as_nanos();
    Some(stamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache() -> (tempfile::TempDir, FrameCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FrameCache::open(&dir.path().join("frames.db")).unwrap();
        (dir, cache)
    }

    #[test]
    fn store_then_get_roundtrip() {
        let (_dir, cache) = temp_cache();
        cache.store("/v/a.mp4", "100", 12.5, b"png-bytes");
        assert_eq!(cache.get("/v/a.mp4", "100", 12.5), Some(b"png-bytes".to_vec()));
    }

    #[test]
    fn stale_mtime_misses() {
        let (_dir, cache) = temp_cache();
        cache.store("/v/a.mp4", "100", 12.5, b"old");
        assert_eq!(cache.get("/v/a.mp4", "200", 12.5), None);
    }

    #[test]
    fn different_timestamp_misses() {
        let (_dir, cache) = temp_cache();
        cache.store("/v/a.mp4", "100", 12.5, b"x");
        assert_eq!(cache.get("/v/a.mp4", "100", 13.0), None);
    }

    #[test]
    fn replace_overwrites() {
        let (_dir, cache) = temp_cache();
        cache.store("/v/a.mp4", "100", 12.5, b"first");
        cache.store("/v/a.mp4", "100", 12.5, b"second");
        assert_eq!(cache.get("/v/a.mp4", "100", 12.5), Some(b"second".to_vec()));
    }

    #[test]
    fn modified_stamp_exists_for_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.mp4");
        std::fs::write(&file, b"x").unwrap();
        assert!(modified_stamp(&file).is_some());
        assert!(modified_stamp(&dir.path().join("missing.mp4")).is_none());
    }
}
