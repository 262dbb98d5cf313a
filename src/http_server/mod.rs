//! # HTTP Server Module
//!
//! REST façade over the record store.
//!
//! # Endpoints
//!
//! - `POST /exectimes`, `GET /exectimes`, `GET /exectimes/:lineage`
//! - `POST /materializations`, `GET /materializations`, `GET /materializations/:lineage`
//! - `GET /times`, `POST /times` - accepted and discarded
//! - `GET /` - liveness greeting

pub mod config;
pub mod errors;
pub mod materialization_routes;
pub mod payload;
pub mod server;
pub mod stats_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer, GREETING};
