//! Orchestration for `docs`: build the HTML documentation if needed and open it.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::errors::{MissingPrerequisite, ensure_success};
use crate::io::host::Host;
use crate::io::process::CommandSpec;
use crate::io::python::{pip, require_env};
use crate::project::Project;

/// Package that provides the documentation generator.
pub const DOC_GENERATOR_PACKAGE: &str = "sphinx";

/// Outcome of `goinsight docs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocsOutcome {
    /// The generator ran because no built index existed.
    pub built: bool,
    /// The generator was missing from the environment and got installed.
    pub generator_installed: bool,
}

/// Build the documentation when the index is missing, then open the index.
pub fn build_docs<H: Host>(host: &H, project: &Project) -> Result<DocsOutcome> {
    let layout = &project.layout;
    let python = require_env(layout)?;
    let mut outcome = DocsOutcome::default();

    if layout.docs_index_path.is_file() {
        info!(path = %layout.docs_index_path.display(), "documentation already built");
    } else {
        if !layout.venv_sphinx_build.is_file() {
            warn!("documentation generator not installed; installing {DOC_GENERATOR_PACKAGE}");
            pip(host, python, ["install", DOC_GENERATOR_PACKAGE])
                .context("install documentation generator")?;
            outcome.generator_installed = true;
            if !layout.venv_sphinx_build.is_file() {
                return Err(MissingPrerequisite::Path {
                    what: "documentation generator",
                    path: layout.venv_sphinx_build.clone(),
                    hint: None,
                }
                .into());
            }
        }

        info!(
            source = %layout.docs_source_dir.display(),
            output = %layout.docs_html_dir.display(),
            "building documentation"
        );
        let spec = CommandSpec::new(&layout.venv_sphinx_build)
            .args(["-b", "html"])
            .arg(&layout.docs_source_dir)
            .arg(&layout.docs_html_dir)
            .current_dir(&layout.root);
        let code = host.run(&spec).context("run documentation generator")?;
        ensure_success("sphinx-build", code)?;
        outcome.built = true;

        if !layout.docs_index_path.is_file() {
            return Err(MissingPrerequisite::Path {
                what: "documentation index",
                path: layout.docs_index_path.clone(),
                hint: None,
            }
            .into());
        }
    }

    host.open(&layout.docs_index_path)?;
    Ok(outcome)
}
