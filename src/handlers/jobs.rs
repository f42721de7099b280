use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::policy;
use crate::db;
use crate::error::ApiError;
use crate::models::application;
use crate::models::job::JobFilters;
use crate::services::JobService;
use crate::validate;

use super::{body_or_empty, TokenQuery};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "_token")]
    pub token: Option<String>,
    pub search: Option<String>,
    pub min_salary: Option<String>,
    pub min_equity: Option<String>,
}

/// GET /jobs - filtered listing, any authenticated identity
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<Value>, ApiError> {
    policy::authenticated(query.token.as_deref())?;

    let filters = JobFilters {
        search: query.search,
        min_salary: query.min_salary,
        min_equity: query.min_equity,
    };

    let pool = db::pool().await?;
    let jobs = JobService::list(&pool, &filters).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

/// POST /jobs - admin only
pub async fn create(
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_admin(&claims)?;

    validate::strip_reserved(&mut body);
    let input = validate::job_new(&body)?;

    let pool = db::pool().await?;
    let job = JobService::create(&pool, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// GET /jobs/:id - any authenticated identity
pub async fn get(
    Path(id): Path<i32>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Value>, ApiError> {
    policy::authenticated(query.token.as_deref())?;

    let pool = db::pool().await?;
    let job = JobService::get(&pool, id).await?;
    Ok(Json(json!({ "job": job })))
}

/// PATCH /jobs/:id - admin only
pub async fn update(
    Path(id): Path<i32>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let mut body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_admin(&claims)?;

    validate::strip_reserved(&mut body);
    let input = validate::job_update(&body)?;

    let pool = db::pool().await?;
    let job = JobService::update(&pool, id, input).await?;
    Ok(Json(json!({ "job": job })))
}

/// DELETE /jobs/:id - admin only
pub async fn remove(
    Path(id): Path<i32>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_admin(&claims)?;

    let pool = db::pool().await?;
    JobService::remove(&pool, id).await?;
    Ok(Json(json!({ "message": "Job deleted" })))
}

/// POST /jobs/:id/apply - the verified caller applies to a job
pub async fn apply(
    Path(id): Path<i32>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;

    validate::strip_reserved(&mut body);
    let input = validate::application_new(&body)?;
    let state = input
        .state
        .unwrap_or_else(|| application::DEFAULT_STATE.to_string());

    let pool = db::pool().await?;
    let application = JobService::apply(&pool, &claims.username, id, &state).await?;
    Ok((StatusCode::CREATED, Json(json!({ "application": application }))))
}
