use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::policy;
use crate::db;
use crate::error::ApiError;
use crate::models::company::CompanyFilters;
use crate::services::CompanyService;
use crate::validate;

use super::{body_or_empty, TokenQuery};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "_token")]
    pub token: Option<String>,
    pub search: Option<String>,
    pub min_employees: Option<String>,
    pub max_employees: Option<String>,
}

/// GET /companies - filtered listing, any authenticated identity
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<Value>, ApiError> {
    policy::authenticated(query.token.as_deref())?;

    let filters = CompanyFilters {
        search: query.search,
        min_employees: query.min_employees,
        max_employees: query.max_employees,
    };

    let pool = db::pool().await?;
    let companies = CompanyService::list(&pool, &filters).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// POST /companies - admin only
pub async fn create(
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_admin(&claims)?;

    validate::strip_reserved(&mut body);
    let input = validate::company_new(&body)?;

    let pool = db::pool().await?;
    let company = CompanyService::create(&pool, input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// GET /companies/:handle - any authenticated identity
pub async fn get(
    Path(handle): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Value>, ApiError> {
    policy::authenticated(query.token.as_deref())?;

    let pool = db::pool().await?;
    let company = CompanyService::get(&pool, &handle).await?;
    Ok(Json(json!({ "company": company })))
}

/// PATCH /companies/:handle - admin only
pub async fn update(
    Path(handle): Path<String>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let mut body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_admin(&claims)?;

    validate::strip_reserved(&mut body);
    let input = validate::company_update(&body)?;

    let pool = db::pool().await?;
    let company = CompanyService::update(&pool, &handle, input).await?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn remove(
    Path(handle): Path<String>,
    Query(query): Query<TokenQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = body_or_empty(body);
    let claims = policy::authenticated(policy::token_from(Some(&body), query.token.as_deref()))?;
    policy::require_admin(&claims)?;

    let pool = db::pool().await?;
    CompanyService::remove(&pool, &handle).await?;
    Ok(Json(json!({ "message": "Company deleted" })))
}
