use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::SqlValue;

use super::job::Job;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

/// Projection returned by company listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanySummary {
    pub handle: String,
    pub name: String,
}

/// A single company together with the jobs it owns.
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyNew {
    pub handle: String,
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub num_employees: Option<i32>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

impl CompanyUpdate {
    /// Supplied fields in declaration order, for the partial update builder.
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(name) = self.name {
            fields.push(("name", SqlValue::Text(name)));
        }
        if let Some(n) = self.num_employees {
            fields.push(("num_employees", SqlValue::Int(n as i64)));
        }
        if let Some(description) = self.description {
            fields.push(("description", SqlValue::Text(description)));
        }
        if let Some(logo_url) = self.logo_url {
            fields.push(("logo_url", SqlValue::Text(logo_url)));
        }
        fields
    }
}

/// Raw listing filters as they arrive on the query string. Numeric
/// parsing is the filter builder's job.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilters {
    pub search: Option<String>,
    pub min_employees: Option<String>,
    pub max_employees: Option<String>,
}
