//! # HTTP Server
//!
//! Combines the statistics and materialization routers with the liveness
//! greeting and the JSON 404 fallback.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::store::RecordStore;

use super::config::HttpServerConfig;
use super::errors::ApiError;
use super::materialization_routes::materialization_routes;
use super::stats_routes::stats_routes;

/// Body of `GET /`
pub const GREETING: &str = "Hallo Welt";

/// HTTP server over a shared record store
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server for `store` with the given bind configuration
    pub fn new(config: HttpServerConfig, store: Arc<RecordStore>) -> Self {
        Self {
            config,
            router: build_router(store),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C.
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(event = "server_start", addr = %addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(event = "server_stopped", addr = %addr);
        Ok(())
    }
}

/// Build the full router over `store`
pub fn build_router(store: Arc<RecordStore>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .merge(stats_routes(store.clone()))
        .merge(materialization_routes(store))
        .fallback(not_found_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn index_handler() -> impl IntoResponse {
    (StatusCode::OK, GREETING)
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
