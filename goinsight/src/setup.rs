//! Orchestration for `setup`: provision the Python environment, then build docs.

use std::ffi::OsStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::docs::{DocsOutcome, build_docs};
use crate::io::host::Host;
use crate::io::python::{create_env, find_bootstrap_python, pip, require_env};
use crate::project::Project;

/// Outcome of `goinsight setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupOutcome {
    /// False when the environment already existed.
    pub env_created: bool,
    /// False when the dependency manifest was absent.
    pub manifest_installed: bool,
    pub docs: DocsOutcome,
}

/// Provision the environment in `project` and finish with [`build_docs`].
///
/// Every step is idempotent: an existing environment is reused and the
/// installer calls are safe to repeat.
pub fn run_setup<H: Host>(host: &H, project: &Project) -> Result<SetupOutcome> {
    let layout = &project.layout;
    let bootstrap = find_bootstrap_python(host)?;
    info!(python = %bootstrap.display(), "using bootstrap interpreter");

    let env_created = if layout.venv_python.is_file() {
        info!(path = %layout.venv_dir.display(), "Python environment already exists");
        false
    } else {
        create_env(host, &bootstrap, &layout.venv_dir)?;
        true
    };
    let python = require_env(layout)?;

    info!("upgrading package installer");
    pip(host, python, ["install", "--upgrade", "pip"]).context("upgrade pip")?;

    let manifest_installed = if layout.manifest_path.is_file() {
        info!(manifest = %layout.manifest_path.display(), "installing dependencies");
        let args = [
            OsStr::new("install"),
            OsStr::new("-r"),
            layout.manifest_path.as_os_str(),
        ];
        pip(host, python, args).context("install dependency manifest")?;
        true
    } else {
        warn!(
            manifest = %layout.manifest_path.display(),
            "dependency manifest not found; skipping dependency install"
        );
        false
    };

    let docs = build_docs(host, project).context("build documentation")?;
    Ok(SetupOutcome {
        env_created,
        manifest_installed,
        docs,
    })
}
