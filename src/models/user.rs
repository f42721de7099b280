use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::SqlValue;

/// Full user row including the hashed credential. Never serialized;
/// used only where the hash is needed (login verification).
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub is_admin: bool,
}

/// User shape exposed by the API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserPublic {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub is_admin: bool,
}

/// Projection returned by user listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A job application as seen from the applicant's side.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserApplication {
    pub job_id: i32,
    pub title: String,
    pub company_handle: String,
    pub state: String,
}

/// A single user together with their applications.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserPublic,
    pub applications: Vec<UserApplication>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserNew {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl UserUpdate {
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(password) = self.password {
            fields.push(("password", SqlValue::Text(password)));
        }
        if let Some(first_name) = self.first_name {
            fields.push(("first_name", SqlValue::Text(first_name)));
        }
        if let Some(last_name) = self.last_name {
            fields.push(("last_name", SqlValue::Text(last_name)));
        }
        if let Some(email) = self.email {
            fields.push(("email", SqlValue::Text(email)));
        }
        if let Some(photo_url) = self.photo_url {
            fields.push(("photo_url", SqlValue::Text(photo_url)));
        }
        fields
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
