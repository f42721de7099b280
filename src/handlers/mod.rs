pub mod companies;
pub mod jobs;
pub mod session;
pub mod users;

use axum::Json;
use serde::Deserialize;
use serde_json::Value;

/// Query-string credential shared by routes that take no other query
/// parameters.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    #[serde(rename = "_token")]
    pub token: Option<String>,
}

/// Unwrap an optional JSON body into a Value, defaulting to an empty
/// object so token extraction and validation see a uniform shape.
pub(crate) fn body_or_empty(body: Option<Json<Value>>) -> Value {
    body.map(|Json(v)| v).unwrap_or_else(|| Value::Object(Default::default()))
}
