//! Routes an [`Operation`] to its step sequence and prints the summary.

use anyhow::Result;
use tracing::debug;

use crate::clean::run_clean;
use crate::core::operation::{Operation, render_help};
use crate::docs::build_docs;
use crate::exit_codes;
use crate::fetch::fetch_model;
use crate::io::host::Host;
use crate::project::Project;
use crate::session::run_session;
use crate::setup::run_setup;
use crate::testing::run_tests;
use crate::tune::tune_model;

/// Run `operation` and return the process exit code.
///
/// `tests` and `run-model` return the child's own exit code; every other
/// operation returns [`exit_codes::OK`] or an error.
pub fn dispatch<H: Host>(operation: Operation, host: &H, project: &Project) -> Result<i32> {
    debug!(operation = operation.name(), root = %project.root().display(), "dispatching");
    match operation {
        Operation::Help => {
            print!("{}", render_help());
        }
        Operation::Setup => {
            let outcome = run_setup(host, project)?;
            if outcome.env_created {
                println!("created {}", project.layout.venv_dir.display());
            }
            println!("setup complete");
        }
        Operation::Clean => {
            let report = run_clean(&project.layout);
            println!("{}", report.summary());
        }
        Operation::Docs => {
            build_docs(host, project)?;
            println!("opened {}", project.layout.docs_index_path.display());
        }
        Operation::Tests => return run_tests(host, project),
        Operation::GetModel => {
            let outcome = fetch_model(host, project)?;
            println!("engine: {}", outcome.engine.display());
            println!("weights: {}", project.layout.weights_path.display());
        }
        Operation::OptModel => {
            let outcome = tune_model(host, project)?;
            println!(
                "numSearchThreads = {} written to {}",
                outcome.threads,
                outcome.config_path.display()
            );
        }
        Operation::RunModel => return run_session(host, project),
    }
    Ok(exit_codes::OK)
}
