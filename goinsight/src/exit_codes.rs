//! Stable exit codes for the goinsight CLI.
//!
//! `tests`, `run-model` and failed child processes forward the child's own
//! code instead.

/// Operation succeeded.
pub const OK: i32 = 0;
/// Missing prerequisite, parse error, I/O or network failure.
pub const FAILURE: i32 = 1;
/// Unknown operation or malformed arguments (reported by clap).
pub const USAGE: i32 = 2;
