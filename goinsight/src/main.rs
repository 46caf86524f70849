//! Lifecycle orchestrator for the GoInsight project.
//!
//! Takes exactly one operation token (default `help`) and runs that
//! operation's steps against the project root.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use goinsight::core::operation::{Operation, render_help};
use goinsight::dispatch::dispatch;
use goinsight::errors::ChildExit;
use goinsight::exit_codes;
use goinsight::io::config::CONFIG_FILE_NAME;
use goinsight::io::host::SystemHost;
use goinsight::logging;
use goinsight::project::Project;

#[derive(Parser)]
#[command(
    name = "goinsight",
    version,
    about = "Set up, document, test and run the GoInsight project"
)]
struct Cli {
    /// Operation to run.
    #[arg(value_enum, default_value_t = Operation::Help)]
    operation: Operation,

    /// Project root (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Tool configuration file (defaults to `<root>/goinsight.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<ChildExit>())
                .map_or(exit_codes::FAILURE, |exit| exit.code);
            std::process::exit(code);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if cli.operation == Operation::Help {
        print!("{}", render_help());
        return Ok(exit_codes::OK);
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let config_path = cli.config.unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
    let project = Project::load(&root, &config_path)?;
    dispatch(cli.operation, &SystemHost, &project)
}
