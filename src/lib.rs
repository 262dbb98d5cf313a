//! statserver - a small record store for job execution statistics
//!
//! Stage timings and lineage materializations are posted over HTTP, kept in
//! an append-only record file, and read back by lineage or in bulk.

pub mod cli;
pub mod http_server;
pub mod records;
pub mod storage;
pub mod store;
