//! Structural validation gate.
//!
//! Raw JSON bodies pass through a compiled JSON Schema before being
//! deserialized into the per-operation input structs; invalid payloads
//! short-circuit with every violation message before any service runs.
//! Immutable identity fields are rejected here too, so those requests
//! never reach the store.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::application::ApplicationNew;
use crate::models::company::{CompanyNew, CompanyUpdate};
use crate::models::job::{JobNew, JobUpdate};
use crate::models::user::{LoginRequest, UserNew, UserUpdate};
use crate::query::RESERVED_PREFIX;

macro_rules! compiled_schema {
    ($name:ident, $file:literal) => {
        static $name: Lazy<JSONSchema> = Lazy::new(|| {
            static RAW: Lazy<Value> = Lazy::new(|| {
                serde_json::from_str(include_str!(concat!("../../schemas/", $file)))
                    .expect(concat!($file, " is valid JSON"))
            });
            JSONSchema::compile(&RAW).expect(concat!($file, " is a valid schema"))
        });
    };
}

compiled_schema!(COMPANY_NEW, "company_new.json");
compiled_schema!(COMPANY_UPDATE, "company_update.json");
compiled_schema!(JOB_NEW, "job_new.json");
compiled_schema!(JOB_UPDATE, "job_update.json");
compiled_schema!(USER_NEW, "user_new.json");
compiled_schema!(USER_UPDATE, "user_update.json");
compiled_schema!(LOGIN, "login.json");
compiled_schema!(APPLICATION_NEW, "application_new.json");

/// Drop reserved-prefixed fields (protocol metadata such as `_token`)
/// from a payload before it is validated or persisted.
pub fn strip_reserved(payload: &mut Value) {
    if let Value::Object(map) = payload {
        map.retain(|key, _| !key.starts_with(RESERVED_PREFIX));
    }
}

pub fn company_new(payload: &Value) -> Result<CompanyNew, ApiError> {
    gate(&COMPANY_NEW, payload)
}

pub fn company_update(payload: &Value) -> Result<CompanyUpdate, ApiError> {
    reject_fields(
        payload,
        &["handle"],
        "You are not allowed to change the handle.",
    )?;
    gate(&COMPANY_UPDATE, payload)
}

pub fn job_new(payload: &Value) -> Result<JobNew, ApiError> {
    gate(&JOB_NEW, payload)
}

pub fn job_update(payload: &Value) -> Result<JobUpdate, ApiError> {
    reject_fields(payload, &["id"], "You are not allowed to change the ID.")?;
    gate(&JOB_UPDATE, payload)
}

pub fn user_new(payload: &Value) -> Result<UserNew, ApiError> {
    gate(&USER_NEW, payload)
}

pub fn user_update(payload: &Value) -> Result<UserUpdate, ApiError> {
    reject_fields(
        payload,
        &["username", "is_admin"],
        "You are not allowed to change username or is_admin properties.",
    )?;
    gate(&USER_UPDATE, payload)
}

pub fn login(payload: &Value) -> Result<LoginRequest, ApiError> {
    gate(&LOGIN, payload)
}

pub fn application_new(payload: &Value) -> Result<ApplicationNew, ApiError> {
    gate(&APPLICATION_NEW, payload)
}

fn gate<T: DeserializeOwned>(schema: &JSONSchema, payload: &Value) -> Result<T, ApiError> {
    if !payload.is_object() {
        return Err(ApiError::ValidationFailed(vec![
            "Request body must be a JSON object".to_string(),
        ]));
    }

    if let Err(errors) = schema.validate(payload) {
        let messages = errors.map(|e| e.to_string()).collect::<Vec<_>>();
        return Err(ApiError::ValidationFailed(messages));
    }

    serde_json::from_value(payload.clone())
        .map_err(|e| ApiError::ValidationFailed(vec![e.to_string()]))
}

/// Immutable identity fields must not appear in an update payload at all,
/// whatever else is supplied. The message is fixed per operation.
fn reject_fields(payload: &Value, fields: &[&str], message: &str) -> Result<(), ApiError> {
    if let Value::Object(map) = payload {
        if fields.iter().any(|f| map.contains_key(*f)) {
            return Err(ApiError::ValidationFailed(vec![message.to_string()]));
        }
    }
    Ok(())
}
