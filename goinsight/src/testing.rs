//! Orchestration for `tests`: run the project's test suite inside the environment.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::io::host::Host;
use crate::io::process::CommandSpec;
use crate::io::python::{module_available, pip, require_env};
use crate::project::Project;

pub const TEST_RUNNER_MODULE: &str = "pytest";

/// Run the test suite verbosely and return the runner's exit code unchanged.
///
/// The test runner is installed into the environment when its version check
/// fails.
pub fn run_tests<H: Host>(host: &H, project: &Project) -> Result<i32> {
    let layout = &project.layout;
    let python = require_env(layout)?;

    if !module_available(host, python, TEST_RUNNER_MODULE)? {
        warn!("{TEST_RUNNER_MODULE} not available in the environment; installing");
        pip(host, python, ["install", TEST_RUNNER_MODULE]).context("install test runner")?;
    }

    info!(tests = %layout.tests_dir.display(), "running test suite");
    let spec = CommandSpec::new(python)
        .args(["-m", TEST_RUNNER_MODULE, "-v"])
        .arg(&layout.tests_dir)
        .current_dir(&layout.root);
    host.run(&spec).context("run test suite")
}
