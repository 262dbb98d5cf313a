//! CLI argument definitions using clap
//!
//! statserver -f <file> -p <port>

use clap::Parser;
use std::path::PathBuf;

/// Record store for job execution statistics and lineage materializations
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "statserver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File backing the record store
    #[arg(short = 'f', long = "file", default_value = "statserver.db")]
    pub file: PathBuf,

    /// Port for the REST server to listen on (all interfaces)
    #[arg(short = 'p', long = "port", default_value_t = 5000)]
    pub port: u16,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
