//! Isolated Python environment helpers.
//!
//! Wraps bootstrap-interpreter discovery, venv creation and pip invocations.
//! All process work goes through [`Host`] so callers stay testable.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::errors::{MissingPrerequisite, ensure_success};
use crate::io::host::Host;
use crate::io::layout::ProjectLayout;
use crate::io::process::CommandSpec;

#[cfg(target_os = "windows")]
pub const PYTHON_CANDIDATES: &[&str] = &["python"];

#[cfg(not(target_os = "windows"))]
pub const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Find an interpreter suitable for creating the environment.
pub fn find_bootstrap_python<H: Host>(host: &H) -> Result<PathBuf, MissingPrerequisite> {
    PYTHON_CANDIDATES
        .iter()
        .find_map(|candidate| host.find_program(candidate))
        .ok_or_else(|| MissingPrerequisite::Runtime {
            tried: PYTHON_CANDIDATES.join(", "),
        })
}

/// Return the environment interpreter, failing if the environment was never created.
pub fn require_env(layout: &ProjectLayout) -> Result<&Path, MissingPrerequisite> {
    if layout.venv_python.is_file() {
        Ok(&layout.venv_python)
    } else {
        Err(MissingPrerequisite::Path {
            what: "Python environment interpreter",
            path: layout.venv_python.clone(),
            hint: Some("run `goinsight setup` first"),
        })
    }
}

/// Create the environment with `<bootstrap> -m venv <dir>`.
pub fn create_env<H: Host>(host: &H, bootstrap: &Path, env_dir: &Path) -> Result<()> {
    info!(path = %env_dir.display(), "creating Python environment");
    let spec = CommandSpec::new(bootstrap).args(["-m", "venv"]).arg(env_dir);
    let code = host
        .run(&spec)
        .with_context(|| format!("create Python environment at {}", env_dir.display()))?;
    ensure_success("python -m venv", code)?;
    Ok(())
}

/// Run `<python> -m pip <args>` and fail on a nonzero exit.
pub fn pip<H, I, S>(host: &H, python: &Path, args: I) -> Result<()>
where
    H: Host,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let spec = CommandSpec::new(python).args(["-m", "pip"]).args(args);
    let code = host.run(&spec).context("run pip")?;
    ensure_success("pip", code)?;
    Ok(())
}

/// Run `<python> -m <module> --version`; true when the module is importable.
pub fn module_available<H: Host>(host: &H, python: &Path, module: &str) -> Result<bool> {
    let spec = CommandSpec::new(python).args(["-m", module, "--version"]);
    let code = host
        .run(&spec)
        .with_context(|| format!("check Python module {module}"))?;
    Ok(code == 0)
}
