//! Host abstraction for everything that leaves the process.
//!
//! The [`Host`] trait decouples operations from the real system: child
//! processes, the search path, the network, and the desktop viewer. Tests use
//! a scripted host that records calls without spawning anything.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::io::process::{CommandSpec, run_inherited, run_tee};

/// Side-effecting capabilities used by operations.
pub trait Host {
    /// Resolve a program name on the search path.
    fn find_program(&self, name: &str) -> Option<PathBuf>;

    /// Run with inherited stdio and return the exit code.
    fn run(&self, spec: &CommandSpec) -> Result<i32>;

    /// Run while duplicating combined output to the terminal and `log_path`.
    fn run_tee(&self, spec: &CommandSpec, log_path: &Path) -> Result<i32>;

    /// Download `url` to `dest` in a single attempt.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// Open a file with the platform's default viewer.
    fn open(&self, path: &Path) -> Result<()>;

    fn pause(&self, duration: Duration);
}

/// Host backed by the real operating system.
pub struct SystemHost;

impl Host for SystemHost {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn run(&self, spec: &CommandSpec) -> Result<i32> {
        run_inherited(spec)
    }

    fn run_tee(&self, spec: &CommandSpec, log_path: &Path) -> Result<i32> {
        run_tee(spec, log_path)
    }

    #[instrument(skip_all, fields(url = %url))]
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        download_to(url, dest)
    }

    fn open(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "opening with default viewer");
        open::that(path).with_context(|| format!("open {}", path.display()))
    }

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Stream a URL into `<dest>.part`, then rename onto `dest`.
///
/// A failed download never leaves a truncated file at `dest`.
fn download_to(url: &str, dest: &Path) -> Result<()> {
    let parent = dest
        .parent()
        .with_context(|| format!("download path missing parent {}", dest.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;

    info!(dest = %dest.display(), "downloading");
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("download {url}"))?;

    let part_path = part_path(dest)?;
    let file = File::create(&part_path)
        .with_context(|| format!("create {}", part_path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut reader = response.into_body().into_reader();
    let copied = match io::copy(&mut reader, &mut writer).and_then(|n| writer.flush().map(|()| n)) {
        Ok(n) => n,
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(&part_path);
            return Err(e).with_context(|| format!("write {}", part_path.display()));
        }
    };
    drop(writer);

    fs::rename(&part_path, dest)
        .with_context(|| format!("move {} to {}", part_path.display(), dest.display()))?;
    debug!(bytes = copied, "download complete");
    Ok(())
}

fn part_path(dest: &Path) -> Result<PathBuf> {
    let name = dest
        .file_name()
        .ok_or_else(|| anyhow!("download path has no file name {}", dest.display()))?;
    let mut part = name.to_os_string();
    part.push(".part");
    Ok(dest.with_file_name(part))
}
