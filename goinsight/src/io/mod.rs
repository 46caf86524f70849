//! I/O adapters used by the operations.

pub mod archive;
pub mod config;
pub mod host;
pub mod layout;
pub mod locate;
pub mod process;
pub mod python;
