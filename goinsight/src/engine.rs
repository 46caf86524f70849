//! Locating the engine executable and its companion files.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::debug;

use crate::core::platform::EngineSource;
use crate::errors::MissingPrerequisite;
use crate::io::host::Host;
use crate::io::locate::find_file;
use crate::project::Project;

pub const GET_MODEL_HINT: &str = "run `goinsight get-model` first";

/// Where `get-model` should obtain the engine from.
///
/// An explicit `engine.archive_url` wins over the platform default.
pub fn engine_source(project: &Project) -> Result<EngineSource> {
    if let Some(url) = &project.config.engine.archive_url {
        return Ok(EngineSource::Archive(url.clone()));
    }
    match project.platform.engine_source(&project.config.engine.version) {
        EngineSource::Unsupported { os, arch } => bail!(
            "no prebuilt engine for {os}/{arch}; set engine.archive_url or engine.executable in the config"
        ),
        source => Ok(source),
    }
}

/// Resolve the engine executable.
///
/// Order: pinned `engine.executable`, then a search of the model directory,
/// then the search path on platforms without a prebuilt archive.
pub fn resolve_engine<H: Host>(host: &H, project: &Project) -> Result<PathBuf> {
    let layout = &project.layout;
    if let Some(pinned) = &project.config.engine.executable {
        let path = layout.root.join(pinned);
        require_file("pinned engine executable", &path, None)?;
        return Ok(path);
    }

    if let Some(found) = find_file(&layout.model_dir, &layout.engine_executable_name) {
        debug!(path = %found.display(), "engine found under model directory");
        return Ok(found);
    }

    if let EngineSource::SystemPath { install_hint } =
        project.platform.engine_source(&project.config.engine.version)
    {
        return host
            .find_program(&layout.engine_executable_name)
            .ok_or_else(|| {
                MissingPrerequisite::Program {
                    what: "engine executable",
                    hint: install_hint.to_string(),
                }
                .into()
            });
    }

    Err(MissingPrerequisite::Path {
        what: "engine executable",
        path: layout.model_dir.join(&layout.engine_executable_name),
        hint: Some(GET_MODEL_HINT),
    }
    .into())
}

/// Fail with [`MissingPrerequisite`] unless `path` is an existing file.
pub fn require_file(
    what: &'static str,
    path: &Path,
    hint: Option<&'static str>,
) -> Result<(), MissingPrerequisite> {
    if path.is_file() {
        Ok(())
    } else {
        Err(MissingPrerequisite::Path {
            what,
            path: path.to_path_buf(),
            hint,
        })
    }
}
