//! JSON request body extraction

use axum::http::{header, HeaderMap};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};

/// Whether the request declares a JSON body (`application/json` or `application/*+json`).
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// `null`, `false`, zero, and empty strings, arrays and objects.
fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Parses the body of a JSON-consuming POST.
///
/// Returns `ApiError::NotFound` when the content type is not JSON, the
/// body does not parse, or the parsed value is empty.
pub fn json_body(headers: &HeaderMap, body: &[u8]) -> ApiResult<Value> {
    if !is_json_content_type(headers) {
        return Err(ApiError::NotFound);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::NotFound)?;
    if is_empty_json(&value) {
        return Err(ApiError::NotFound);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(is_json_content_type(&headers("application/vnd.stats+json")));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn test_valid_body() {
        let value = json_body(&headers("application/json"), br#"{"lineage":"L1"}"#).unwrap();
        assert_eq!(value, json!({"lineage": "L1"}));
    }

    #[test]
    fn test_rejected_bodies() {
        let json = headers("application/json");
        let bodies: [&[u8]; 8] = [b"", b"not json", b"{}", b"[]", b"null", b"0", b"false", b"\"\""];
        for body in bodies {
            assert!(
                matches!(json_body(&json, body), Err(ApiError::NotFound)),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_wrong_content_type_rejected() {
        let result = json_body(&headers("text/plain"), br#"{"lineage":"L1"}"#);
        assert!(matches!(result, Err(ApiError::NotFound)));
    }
}
