//! Typed errors that callers branch on.
//!
//! Everything else travels as `anyhow::Error` with context attached.

use std::path::PathBuf;

use thiserror::Error;

/// A child process finished with a nonzero exit code.
///
/// `main` forwards `code` as the tool's own exit code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{program} exited with code {code}")]
pub struct ChildExit {
    pub program: String,
    pub code: i32,
}

/// A file, directory or program an operation depends on is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingPrerequisite {
    #[error("Python not found on the search path (tried: {tried})")]
    Runtime { tried: String },
    #[error("{what} not found at {}{}", .path.display(), hint_suffix(.hint))]
    Path {
        what: &'static str,
        path: PathBuf,
        hint: Option<&'static str>,
    },
    #[error("{what} not found ({hint})")]
    Program { what: &'static str, hint: String },
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(hint) => format!(" ({hint})"),
        None => String::new(),
    }
}

/// Turn a nonzero exit code into a [`ChildExit`] error.
pub fn ensure_success(program: impl Into<String>, code: i32) -> Result<(), ChildExit> {
    if code == 0 {
        Ok(())
    } else {
        Err(ChildExit {
            program: program.into(),
            code,
        })
    }
}
