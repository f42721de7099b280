use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Join row between a user and a job. Existence implies intent; `state`
/// tracks where the application stands.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Application {
    pub username: String,
    pub job_id: i32,
    pub state: String,
}

pub const DEFAULT_STATE: &str = "applied";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationNew {
    pub state: Option<String>,
}
