//! CLI module for statserver
//!
//! Parses `-f/--file` and `-p/--port`, opens the record store and serves
//! the REST API in the foreground.

mod args;
mod commands;
mod errors;

pub use args::Cli;
pub use commands::{init_logging, run, serve, ServerConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
