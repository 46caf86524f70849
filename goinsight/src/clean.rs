//! Orchestration for `clean`: best-effort removal of generated directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::io::layout::ProjectLayout;

/// What `clean` did with each generated directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
    /// Paths that did not exist.
    pub skipped: Vec<PathBuf>,
    /// Paths that could not be removed, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary printed by `goinsight clean`.
    pub fn summary(&self) -> String {
        let counts = format!(
            "removed {}, skipped {}, failed {}",
            self.removed.len(),
            self.skipped.len(),
            self.failed.len()
        );
        if self.is_complete() {
            return counts;
        }
        let failed: Vec<String> = self
            .failed
            .iter()
            .map(|(path, _)| path.display().to_string())
            .collect();
        format!("{counts}; still present: {}", failed.join(", "))
    }
}

/// Remove every generated directory of `layout`.
pub fn run_clean(layout: &ProjectLayout) -> CleanReport {
    clean_paths(layout.generated_dirs(), |path| fs::remove_dir_all(path))
}

/// Remove each path with `remove`, continuing past failures.
pub fn clean_paths<'a, I, F>(paths: I, mut remove: F) -> CleanReport
where
    I: IntoIterator<Item = &'a Path>,
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut report = CleanReport::default();
    for path in paths {
        if !path.exists() {
            info!(path = %path.display(), "nothing to remove");
            report.skipped.push(path.to_path_buf());
            continue;
        }
        match remove(path) {
            Ok(()) => {
                info!(path = %path.display(), "removed");
                report.removed.push(path.to_path_buf());
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to remove");
                report.failed.push((path.to_path_buf(), err.to_string()));
            }
        }
    }
    report
}
