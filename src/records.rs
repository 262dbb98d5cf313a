//! Record shapes accepted by the service
//!
//! Each record is built from an inbound JSON body by picking a fixed set of
//! fields. Only presence is checked: values are carried through as whatever
//! JSON the client sent. A missing field rejects the whole record.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while shaping a request body into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required key is absent (or the body is not an object)
    #[error("missing required field: {0}")]
    MissingField(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

fn required(body: &Value, field: &str) -> RecordResult<Value> {
    body.get(field)
        .cloned()
        .ok_or_else(|| RecordError::MissingField(field.to_string()))
}

/// Timing of one stage of a job run, stored in `exectimes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionTiming {
    pub appname: Value,
    pub stageid: Value,
    pub stagename: Value,
    pub lineage: Value,
    pub stageduration: Value,
    pub progduration: Value,
    pub submissiontime: Value,
    pub completiontime: Value,
    pub size: Value,
}

impl ExecutionTiming {
    pub fn from_json(body: &Value) -> RecordResult<Self> {
        Ok(Self {
            appname: required(body, "appname")?,
            stageid: required(body, "stageid")?,
            stagename: required(body, "stagename")?,
            lineage: required(body, "lineage")?,
            stageduration: required(body, "stageduration")?,
            progduration: required(body, "progduration")?,
            submissiontime: required(body, "submissiontime")?,
            completiontime: required(body, "completiontime")?,
            size: required(body, "size")?,
        })
    }
}

/// Storage location of the computed value of a lineage, stored in `materializations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Materialization {
    pub lineage: Value,
    pub path: Value,
}

impl Materialization {
    pub fn from_json(body: &Value) -> RecordResult<Self> {
        Ok(Self {
            lineage: required(body, "lineage")?,
            path: required(body, "path")?,
        })
    }
}

/// Per-partition timing reported to `/times`. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingSample {
    pub lineage: Value,
    #[serde(rename = "partitionId")]
    pub partition_id: Value,
    pub time: Value,
}

impl TimingSample {
    pub fn from_json(body: &Value) -> RecordResult<Self> {
        Ok(Self {
            lineage: required(body, "lineage")?,
            partition_id: required(body, "partitionId")?,
            time: required(body, "time")?,
        })
    }
}
