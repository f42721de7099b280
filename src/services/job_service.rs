use sqlx::PgPool;

use crate::db::{self, SqlValue};
use crate::error::ApiError;
use crate::models::application::Application;
use crate::models::job::{CompanyProfile, Job, JobDetail, JobFilters, JobNew, JobSummary, JobUpdate};
use crate::query::{partial_update, FilterBuilder};

pub struct JobService;

impl JobService {
    /// List jobs matching the optional filters, ordered by insertion id.
    pub async fn list(pool: &PgPool, filters: &JobFilters) -> Result<Vec<JobSummary>, ApiError> {
        let (sql, values) = FilterBuilder::new("SELECT id, title, company_handle FROM jobs")
            .contains("title", filters.search.as_deref())
            .min_float("salary", filters.min_salary.as_deref())
            .min_float("equity", filters.min_equity.as_deref())
            .order_by("id")
            .build();

        let jobs = db::bind_values_as(sqlx::query_as::<_, JobSummary>(&sql), &values)
            .fetch_all(pool)
            .await?;
        Ok(jobs)
    }

    /// Fetch one job and its owning company. Both steps must succeed.
    pub async fn get(pool: &PgPool, id: i32) -> Result<JobDetail, ApiError> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT id, title, salary, equity, company_handle
               FROM jobs
              WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Self::missing(id))?;

        let company = sqlx::query_as::<_, CompanyProfile>(
            "SELECT name, num_employees, description, logo_url
               FROM companies
              WHERE handle = $1",
        )
        .bind(&job.company_handle)
        .fetch_one(pool)
        .await?;

        Ok(JobDetail { job, company })
    }

    /// Insert a job. The company reference is enforced by the store; a
    /// foreign key failure means the named company does not exist.
    pub async fn create(pool: &PgPool, input: JobNew) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING id, title, salary, equity, company_handle",
        )
        .bind(&input.title)
        .bind(input.salary)
        .bind(input.equity)
        .bind(&input.company_handle)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                ApiError::NotFound(format!(
                    "No company exists with handle '{}'",
                    input.company_handle
                ))
            } else {
                e.into()
            }
        })
    }

    pub async fn update(pool: &PgPool, id: i32, input: JobUpdate) -> Result<Job, ApiError> {
        let (sql, values) =
            partial_update("jobs", input.into_fields(), "id", SqlValue::Int(id as i64))?;

        db::bind_values_as(sqlx::query_as::<_, Job>(&sql), &values)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::missing(id))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => Ok(()),
            None => Err(Self::missing(id)),
        }
    }

    /// Record the verified caller's application to a job.
    pub async fn apply(
        pool: &PgPool,
        username: &str,
        job_id: i32,
        state: &str,
    ) -> Result<Application, ApiError> {
        let job = sqlx::query("SELECT 1 FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
        if job.is_none() {
            return Err(Self::missing(job_id));
        }

        sqlx::query_as::<_, Application>(
            "INSERT INTO applications (username, job_id, state)
             VALUES ($1, $2, $3)
             RETURNING username, job_id, state",
        )
        .bind(username)
        .bind(job_id)
        .bind(state)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ApiError::Conflict(format!("You have already applied to job {}", job_id))
            } else if db::is_foreign_key_violation(&e) {
                Self::missing(job_id)
            } else {
                e.into()
            }
        })
    }

    fn missing(id: i32) -> ApiError {
        ApiError::NotFound(format!("There exists no job '{}'", id))
    }
}
