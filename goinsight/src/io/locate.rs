//! Recursive file lookup under a directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Find the first regular file named `file_name` under `dir`.
///
/// The walk is sorted by file name so the result is stable when several
/// copies exist. A missing or unreadable directory yields `None`.
pub fn find_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(walkdir::DirEntry::into_path)
}
