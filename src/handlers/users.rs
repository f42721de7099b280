use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{self, policy, Claims};
use crate::db;
use crate::error::ApiError;
use crate::services::UserService;
use crate::validate;

use super::{body_or_empty, TokenQuery};

/// GET /users - any authenticated identity
pub async fn list(Query(query): Query<TokenQuery>) -> Result<Json<Value>, ApiError> {
    policy::authenticated(query.token.as_deref())?;

    let pool = db::pool().await?;
    let users = UserService::list(&pool).await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /users/:username - any authenticated identity
pub async fn get(
    Path(username): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Value>, ApiError> {
    policy::authenticated(query.token.as_deref())?;

    let pool = db::pool().await?;
    let user = UserService::get(&pool, &username).await?;
    Ok(Json(json!({ "user": user })))
}

/// POST /users - public registration; responds with the new user and a
/// token minted from the stored identity
pub async fn register(body: Option<Json<Value>>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut body = body_or_empty(body);
    validate::strip_reserved(&mut body);
    let input = validate::user_new(&body)?;

    let pool = db::pool().await?;
    let user = UserService::create(&pool, input).await?;
    let token = auth::generate_token(&Claims::new(user.username.as_str(), user.is_admin))?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}

/// PATCH /users/:username - the owner only
pub async fn update(
    Path(username): Path<String>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let mut body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_self(&claims, &username)?;

    validate::strip_reserved(&mut body);
    let input = validate::user_update(&body)?;

    let pool = db::pool().await?;
    let user = UserService::update(&pool, &username, input).await?;
    Ok(Json(json!({ "user": user })))
}

/// DELETE /users/:username - the owner only
pub async fn remove(
    Path(username): Path<String>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_self(&claims, &username)?;

    let pool = db::pool().await?;
    UserService::remove(&pool, &username).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
