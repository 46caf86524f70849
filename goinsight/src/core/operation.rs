//! The closed set of operations the orchestrator can perform.

use clap::ValueEnum;

/// One named operation, selected by the single positional CLI token.
///
/// Parsing is done by clap, so an unknown token never reaches dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Operation {
    Help,
    Setup,
    Clean,
    Docs,
    Tests,
    GetModel,
    OptModel,
    RunModel,
}

impl Operation {
    /// All operations in help order.
    pub const ALL: [Operation; 8] = [
        Operation::Help,
        Operation::Setup,
        Operation::Clean,
        Operation::Docs,
        Operation::Tests,
        Operation::GetModel,
        Operation::OptModel,
        Operation::RunModel,
    ];

    /// Token used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Help => "help",
            Operation::Setup => "setup",
            Operation::Clean => "clean",
            Operation::Docs => "docs",
            Operation::Tests => "tests",
            Operation::GetModel => "get-model",
            Operation::OptModel => "opt-model",
            Operation::RunModel => "run-model",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::Help => "Show this list of operations",
            Operation::Setup => "Create the Python environment, install requirements, build docs",
            Operation::Clean => "Remove the environment, built docs, model, weights and logs",
            Operation::Docs => "Build the Sphinx documentation if needed and open it",
            Operation::Tests => "Run the test suite with pytest inside the environment",
            Operation::GetModel => "Download and extract KataGo and its neural network weights",
            Operation::OptModel => "Benchmark KataGo and store the recommended thread count",
            Operation::RunModel => "Start KataGo in interactive GTP mode",
        }
    }
}

/// Render the operation list printed by `help`.
pub fn render_help() -> String {
    let width = Operation::ALL
        .iter()
        .map(|op| op.name().len())
        .max()
        .unwrap_or(0);
    let mut out = String::from("Usage: goinsight [OPERATION]\n\nOperations:\n");
    for op in Operation::ALL {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            op.name(),
            op.description(),
            width = width
        ));
    }
    out
}
