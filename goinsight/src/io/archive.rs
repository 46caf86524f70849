//! Zip extraction for the engine distribution.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Extract every entry of `archive_path` below `dest_dir`, returning the file count.
///
/// Entries whose names would escape `dest_dir` are skipped. Unix permission
/// bits stored in the archive are restored so the engine stays executable.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .with_context(|| format!("open archive {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("read zip archive {}", archive_path.display()))?;

    fs::create_dir_all(dest_dir)
        .with_context(|| format!("create directory {}", dest_dir.display()))?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("read archive entry {i}"))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create directory {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let mut out_file = File::create(&out_path)
            .with_context(|| format!("create file {}", out_path.display()))?;
        io::copy(&mut entry, &mut out_file)
            .with_context(|| format!("extract {}", out_path.display()))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))
                .with_context(|| format!("set permissions {}", out_path.display()))?;
        }

        debug!(path = %out_path.display(), "extracted");
        extracted += 1;
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_zip;

    #[test]
    fn extracts_nested_entries() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive = temp.path().join("bundle.zip");
        write_zip(
            &archive,
            &[
                ("katago", b"#!/bin/sh\n".as_slice(), 0o755),
                ("configs/default_gtp.cfg", b"logDir = gtp_logs\n".as_slice(), 0o644),
            ],
        )
        .expect("write zip");

        let dest = temp.path().join("model");
        let count = extract_zip(&archive, &dest).expect("extract");
        assert_eq!(count, 2);
        assert!(dest.join("katago").is_file());
        let cfg = fs::read_to_string(dest.join("configs/default_gtp.cfg")).expect("read cfg");
        assert_eq!(cfg, "logDir = gtp_logs\n");
    }

    #[cfg(unix)]
    #[test]
    fn restores_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let archive = temp.path().join("bundle.zip");
        write_zip(&archive, &[("katago", b"bin".as_slice(), 0o755)]).expect("write zip");

        let dest = temp.path().join("model");
        extract_zip(&archive, &dest).expect("extract");
        let mode = fs::metadata(dest.join("katago"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn rejects_non_zip_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive = temp.path().join("bundle.zip");
        fs::write(&archive, b"not a zip").expect("write");
        let err = extract_zip(&archive, &temp.path().join("model")).expect_err("should fail");
        assert!(format!("{err:#}").contains("read zip archive"));
    }
}
