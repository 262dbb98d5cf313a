//! Execution Statistics HTTP Routes
//!
//! Stage timings posted by running jobs, plus the `/times` endpoints,
//! which check their input and store nothing.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::records::{ExecutionTiming, TimingSample};
use crate::store::{Collection, RecordStore};

use super::errors::ApiResult;
use super::payload::json_body;

#[derive(Debug, Serialize)]
pub struct ExectimesResponse {
    pub exectimes: Vec<Value>,
}

/// Create execution statistics routes
pub fn stats_routes(store: Arc<RecordStore>) -> Router {
    Router::new()
        .route("/exectimes", get(list_exectimes_handler).post(insert_exectime_handler))
        .route("/exectimes/:lineage", get(find_exectimes_handler))
        .route("/times", get(times_query_handler).post(times_sample_handler))
        .with_state(store)
}

async fn insert_exectime_handler(
    State(store): State<Arc<RecordStore>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<String> {
    let body = json_body(&headers, &body)?;
    let timing = ExecutionTiming::from_json(&body)?;
    let handle = store.insert(Collection::Exectimes, &timing)?;
    Ok(handle.to_string())
}

async fn list_exectimes_handler(
    State(store): State<Arc<RecordStore>>,
) -> ApiResult<Json<ExectimesResponse>> {
    Ok(Json(ExectimesResponse {
        exectimes: store.all(Collection::Exectimes)?,
    }))
}

async fn find_exectimes_handler(
    State(store): State<Arc<RecordStore>>,
    Path(lineage): Path<String>,
) -> ApiResult<Json<ExectimesResponse>> {
    let exectimes =
        store.find_by_field(Collection::Exectimes, "lineage", &Value::String(lineage))?;
    Ok(Json(ExectimesResponse { exectimes }))
}

/// Logs the first `data` query parameter, if any. Repeated or unknown
/// parameters are accepted.
async fn times_query_handler(Query(params): Query<Vec<(String, String)>>) -> &'static str {
    let data = params
        .into_iter()
        .find_map(|(key, value)| (key == "data").then_some(value));
    tracing::debug!(event = "times_query", data = ?data);
    "ok"
}

/// Validates the sample shape; samples are not stored.
async fn times_sample_handler(headers: HeaderMap, body: Bytes) -> ApiResult<&'static str> {
    let body = json_body(&headers, &body)?;
    let sample = TimingSample::from_json(&body)?;
    tracing::debug!(event = "times_sample", lineage = %sample.lineage, partition = %sample.partition_id);
    Ok("ok")
}
