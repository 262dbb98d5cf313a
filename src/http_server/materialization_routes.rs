//! Materialization HTTP Routes
//!
//! Where the computed value of a lineage has been written. A lineage lookup
//! answers with the first record stored for it.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::records::Materialization;
use crate::store::{Collection, RecordStore};

use super::errors::ApiResult;
use super::payload::json_body;

#[derive(Debug, Serialize)]
pub struct MaterializationsResponse {
    pub materializations: Vec<Value>,
}

/// Create materialization routes
pub fn materialization_routes(store: Arc<RecordStore>) -> Router {
    Router::new()
        .route(
            "/materializations",
            get(list_materializations_handler).post(insert_materialization_handler),
        )
        .route("/materializations/:lineage", get(find_materialization_handler))
        .with_state(store)
}

async fn insert_materialization_handler(
    State(store): State<Arc<RecordStore>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<String> {
    let body = json_body(&headers, &body)?;
    let materialization = Materialization::from_json(&body)?;
    let handle = store.insert(Collection::Materializations, &materialization)?;
    Ok(handle.to_string())
}

async fn list_materializations_handler(
    State(store): State<Arc<RecordStore>>,
) -> ApiResult<Json<MaterializationsResponse>> {
    Ok(Json(MaterializationsResponse {
        materializations: store.all(Collection::Materializations)?,
    }))
}

/// Bare record, or `{}` when the lineage was never materialized.
async fn find_materialization_handler(
    State(store): State<Arc<RecordStore>>,
    Path(lineage): Path<String>,
) -> ApiResult<Json<Value>> {
    let found =
        store.first_by_field(Collection::Materializations, "lineage", &Value::String(lineage))?;
    Ok(Json(found.unwrap_or_else(|| Value::Object(Map::new()))))
}
