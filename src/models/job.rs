use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::SqlValue;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<f64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

/// Projection returned by job listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub company_handle: String,
}

/// Profile of the owning company attached to a single job.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyProfile {
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

/// A single job together with its owning company.
#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub company: CompanyProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobNew {
    pub title: String,
    pub salary: Option<f64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<f64>,
    pub equity: Option<f64>,
}

impl JobUpdate {
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(title) = self.title {
            fields.push(("title", SqlValue::Text(title)));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", SqlValue::Float(salary)));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", SqlValue::Float(equity)));
        }
        fields
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    pub search: Option<String>,
    pub min_salary: Option<String>,
    pub min_equity: Option<String>,
}
