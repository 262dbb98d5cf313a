//! CLI command implementation
//!
//! Boot order: logging, record store, runtime, listener.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::RecordStore;

use super::args::Cli;
use super::errors::{CliError, CliResult};

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// File backing the record store
    pub store_file: PathBuf,

    /// HTTP bind settings
    pub http: HttpServerConfig,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            store_file: cli.file,
            http: HttpServerConfig::with_port(cli.port),
        }
    }
}

/// Entry point: parse arguments and serve
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging();
    serve(&ServerConfig::from(cli))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the store and serve the REST API until terminated
pub fn serve(config: &ServerConfig) -> CliResult<()> {
    let store = Arc::new(RecordStore::open(&config.store_file)?);
    let server = HttpServer::new(config.http.clone(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(server.start())?;

    Ok(())
}
