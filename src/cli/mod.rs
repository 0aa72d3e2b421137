//! Command-line interface
//!
//! Argument parsing and the command runner. The CLI is a thin consumer of
//! the library: it builds a client and search parameters from flags, runs
//! one search, and serializes the result.

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, QueryArgs};
pub use runner::Runner;
