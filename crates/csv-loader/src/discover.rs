//! Locating the climate CSV on disk.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use climate_common::{DashboardError, DashboardResult};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Find the first file under `root` whose name is one of `candidates`.
///
/// The walk is depth-first with files visited before subdirectories and
/// siblings in name order. A match directly inside a directory beats any
/// match below it, but a deep match under an earlier-named subdirectory beats
/// a shallow one under a later-named subdirectory. The result does not depend
/// on directory listing order.
pub fn discover(root: &Path, candidates: &[String]) -> DashboardResult<PathBuf> {
    if !root.is_dir() {
        return Err(DashboardError::NotFound(format!(
            "search root {} is not a directory",
            root.display()
        )));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(files_first);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable path during CSV discovery");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .map(|name| candidates.iter().any(|c| c == name))
            .unwrap_or(false);

        if matches {
            debug!(path = %entry.path().display(), "Found climate CSV");
            return Ok(entry.into_path());
        }
    }

    Err(DashboardError::NotFound(format!(
        "none of {:?} exists under {}",
        candidates,
        root.display()
    )))
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
