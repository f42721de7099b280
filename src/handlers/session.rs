use axum::Json;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::db;
use crate::error::ApiError;
use crate::services::UserService;
use crate::validate;

use super::body_or_empty;

/// POST /login - verify credentials and mint a token
pub async fn login(body: Option<Json<Value>>) -> Result<Json<Value>, ApiError> {
    let body = body_or_empty(body);
    let input = validate::login(&body)?;

    let pool = db::pool().await?;
    let user = UserService::authenticate(&pool, &input.username, &input.password).await?;
    let token = auth::generate_token(&Claims::new(user.username.as_str(), user.is_admin))?;
    Ok(Json(json!({ "token": token })))
}
