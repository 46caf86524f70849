//! Lifecycle orchestrator for the GoInsight project.
//!
//! Provisions a Python environment, builds the Sphinx docs, runs the test
//! suite, and fetches, tunes and launches the KataGo engine. The crate is
//! split the same way throughout:
//!
//! - **[`core`]**: Pure logic (operation names, platform selection, benchmark
//!   parsing, config rewriting). No I/O.
//! - **[`io`]**: Filesystem, process, network and viewer access, funnelled
//!   through the [`io::host::Host`] trait so operations can be tested with a
//!   scripted host.
//!
//! One orchestration module per operation ([`setup`], [`docs`], [`testing`],
//! [`fetch`], [`tune`], [`session`], [`clean`]) combines the two, and
//! [`dispatch`] routes a parsed [`core::operation::Operation`] to it.

pub mod clean;
pub mod core;
pub mod dispatch;
pub mod docs;
pub mod engine;
pub mod errors;
pub mod exit_codes;
pub mod fetch;
pub mod io;
pub mod logging;
pub mod project;
pub mod session;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod testing;
pub mod tune;
