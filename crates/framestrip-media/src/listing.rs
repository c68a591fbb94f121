// crates/framestrip-media/src/listing.rs

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use framestrip_core::error::PreviewError;
use framestrip_core::source::is_video_file;

/// All video files under `folder`, recursively, sorted by path so batch
/// order is deterministic across platforms and filesystems.
pub fn list_video_files(folder: &Path) -> Result<Vec<PathBuf>, PreviewError> {
    if !folder.is_dir() {
        return Err(PreviewError::List(format!(
            "not a directory: {}",
            folder.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder).follow_links(false) {
        let entry = entry.map_err(|e| PreviewError::List(e.to_string()))?;
        if entry.file_type().is_file() && is_video_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    log::debug!("[list] {} video files ← {}", files.len(), folder.display());
    Ok(files)
}
