//! Access policy checked at the request boundary.
//!
//! Three levels on top of public routes: any verified identity, admin
//! only, and "must match the resource owner". The verified `Claims` value
//! is returned to the handler and passed explicitly into service calls;
//! there is no ambient per-request state.

use serde_json::Value;

use crate::error::ApiError;

use super::{verify_token, Claims};

/// The credential travels as a `_token` body field or query parameter,
/// body taking precedence.
pub fn token_from<'a>(body: Option<&'a Value>, query_token: Option<&'a str>) -> Option<&'a str> {
    body.and_then(|b| b.get("_token"))
        .and_then(Value::as_str)
        .or(query_token)
}

/// Any authenticated identity. Missing, malformed, expired or badly
/// signed tokens all surface as `Unauthenticated`.
pub fn authenticated(token: Option<&str>) -> Result<Claims, ApiError> {
    let token = token
        .ok_or_else(|| ApiError::Unauthenticated("You must authenticate first".to_string()))?;
    verify_token(token)
}

pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You must be an admin to access this resource".to_string(),
        ))
    }
}

pub fn require_self(claims: &Claims, username: &str) -> Result<(), ApiError> {
    if claims.username == username {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You may only act on your own account".to_string(),
        ))
    }
}
