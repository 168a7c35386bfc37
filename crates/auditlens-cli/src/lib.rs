//! Building blocks of the `auditlens` binary
//!
//! Argument parsing, report rendering and report saving live here so they
//! can be unit tested without running the binary.

pub mod cli;
pub mod output;
pub mod report;

pub use cli::{Cli, OutputFormat};
