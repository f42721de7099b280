use sqlx::PgPool;

use crate::db::{self, SqlValue};
use crate::error::ApiError;
use crate::models::company::{
    Company, CompanyDetail, CompanyFilters, CompanyNew, CompanySummary, CompanyUpdate,
};
use crate::models::job::Job;
use crate::query::{partial_update, FilterBuilder};

pub struct CompanyService;

impl CompanyService {
    /// List companies matching the optional filters, ordered by name.
    /// Listings return the handle/name summary projection; the full row
    /// is reserved for single-company fetches.
    pub async fn list(
        pool: &PgPool,
        filters: &CompanyFilters,
    ) -> Result<Vec<CompanySummary>, ApiError> {
        let (sql, values) = FilterBuilder::new("SELECT handle, name FROM companies")
            .contains("name", filters.search.as_deref())
            .int_range(
                "num_employees",
                filters.min_employees.as_deref(),
                filters.max_employees.as_deref(),
            )?
            .order_by("name")
            .build();

        let companies = db::bind_values_as(sqlx::query_as::<_, CompanySummary>(&sql), &values)
            .fetch_all(pool)
            .await?;
        Ok(companies)
    }

    /// Fetch one company and the jobs it owns. Both steps must succeed.
    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, ApiError> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT handle, name, num_employees, description, logo_url
               FROM companies
              WHERE handle = $1",
        )
        .bind(handle)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Self::missing(handle))?;

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT id, title, salary, equity, company_handle
               FROM jobs
              WHERE company_handle = $1
              ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    pub async fn create(pool: &PgPool, input: CompanyNew) -> Result<Company, ApiError> {
        // Fast-path rejection; the unique constraint on the insert below
        // is the actual arbiter.
        let existing = sqlx::query("SELECT 1 FROM companies WHERE handle = $1")
            .bind(&input.handle)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(Self::duplicate(&input.handle));
        }

        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (handle, name, num_employees, description, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING handle, name, num_employees, description, logo_url",
        )
        .bind(&input.handle)
        .bind(&input.name)
        .bind(input.num_employees)
        .bind(&input.description)
        .bind(&input.logo_url)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                Self::duplicate(&input.handle)
            } else {
                e.into()
            }
        })
    }

    pub async fn update(
        pool: &PgPool,
        handle: &str,
        input: CompanyUpdate,
    ) -> Result<Company, ApiError> {
        let (sql, values) = partial_update(
            "companies",
            input.into_fields(),
            "handle",
            SqlValue::Text(handle.to_string()),
        )?;

        db::bind_values_as(sqlx::query_as::<_, Company>(&sql), &values)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::missing(handle))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => Ok(()),
            None => Err(Self::missing(handle)),
        }
    }

    fn missing(handle: &str) -> ApiError {
        ApiError::NotFound(format!("No company exists with handle '{}'", handle))
    }

    fn duplicate(handle: &str) -> ApiError {
        ApiError::Conflict(format!("There is already a company with handle '{}'", handle))
    }
}
