//! Orchestration for `run-model`: an interactive GTP session with the engine.

use std::ffi::OsString;
use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::engine::{GET_MODEL_HINT, require_file, resolve_engine};
use crate::io::host::Host;
use crate::io::process::CommandSpec;
use crate::project::Project;

/// Launch the engine in GTP mode with inherited stdio and return its exit code.
///
/// The tool does not interpret the protocol; stdin and stdout pass straight
/// through until the engine exits.
pub fn run_session<H: Host>(host: &H, project: &Project) -> Result<i32> {
    let layout = &project.layout;
    let engine = resolve_engine(host, project)?;
    require_file("engine config", &layout.engine_config_path, Some(GET_MODEL_HINT))?;
    require_file("neural network weights", &layout.weights_path, Some(GET_MODEL_HINT))?;

    fs::create_dir_all(&layout.log_dir)
        .with_context(|| format!("create {}", layout.log_dir.display()))?;

    let mut log_override = OsString::from("logDir=");
    log_override.push(&layout.log_dir);
    let spec = CommandSpec::new(&engine)
        .args(["gtp", "-model"])
        .arg(&layout.weights_path)
        .arg("-config")
        .arg(&layout.engine_config_path)
        .arg("-override-config")
        .arg(log_override)
        .current_dir(&layout.root);

    info!(engine = %engine.display(), "starting GTP session");
    host.run(&spec).context("run engine session")
}
