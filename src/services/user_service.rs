use sqlx::PgPool;

use crate::config;
use crate::db::{self, SqlValue};
use crate::error::ApiError;
use crate::models::user::{
    UserApplication, UserDetail, UserNew, UserPublic, UserRecord, UserSummary, UserUpdate,
};
use crate::query::partial_update;

pub struct UserService;

impl UserService {
    /// Verify a username/password pair against the stored bcrypt hash.
    /// The failure message never reveals which half was wrong.
    pub async fn authenticate(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, ApiError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT username, password, first_name, last_name, email, photo_url, is_admin
               FROM users
              WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        if let Some(user) = user {
            if bcrypt::verify(password, &user.password)? {
                return Ok(user);
            }
        }

        Err(ApiError::Unauthenticated(
            "Invalid username or password".to_string(),
        ))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, ApiError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT username, first_name, last_name, email
               FROM users
              ORDER BY username",
        )
        .fetch_all(pool)
        .await?;
        Ok(users)
    }

    /// Fetch one user and their applications. Both steps must succeed.
    pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, ApiError> {
        let user = sqlx::query_as::<_, UserPublic>(
            "SELECT username, first_name, last_name, email, photo_url, is_admin
               FROM users
              WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Self::missing(username))?;

        let applications = sqlx::query_as::<_, UserApplication>(
            "SELECT a.job_id, j.title, j.company_handle, a.state
               FROM applications AS a
               JOIN jobs AS j ON j.id = a.job_id
              WHERE a.username = $1
              ORDER BY a.job_id",
        )
        .bind(username)
        .fetch_all(pool)
        .await?;

        Ok(UserDetail { user, applications })
    }

    pub async fn create(pool: &PgPool, input: UserNew) -> Result<UserPublic, ApiError> {
        // Fast-path rejection; the primary key on the insert below is the
        // actual arbiter.
        let existing = sqlx::query("SELECT 1 FROM users WHERE username = $1")
            .bind(&input.username)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(Self::duplicate(&input.username));
        }

        let hashed = bcrypt::hash(&input.password, config::config().security.bcrypt_cost)?;

        sqlx::query_as::<_, UserPublic>(
            "INSERT INTO users (username, password, first_name, last_name, email, photo_url, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING username, first_name, last_name, email, photo_url, is_admin",
        )
        .bind(&input.username)
        .bind(&hashed)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.photo_url)
        .bind(input.is_admin.unwrap_or(false))
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                Self::duplicate(&input.username)
            } else {
                e.into()
            }
        })
    }

    /// Apply a partial update. A supplied password is re-hashed before it
    /// reaches the update builder.
    pub async fn update(
        pool: &PgPool,
        username: &str,
        mut input: UserUpdate,
    ) -> Result<UserPublic, ApiError> {
        if let Some(password) = input.password.take() {
            let cost = config::config().security.bcrypt_cost;
            input.password = Some(bcrypt::hash(&password, cost)?);
        }

        let (sql, values) = partial_update(
            "users",
            input.into_fields(),
            "username",
            SqlValue::Text(username.to_string()),
        )?;

        db::bind_values_as(sqlx::query_as::<_, UserPublic>(&sql), &values)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Self::missing(username))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), ApiError> {
        let deleted = sqlx::query("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(_) => Ok(()),
            None => Err(Self::missing(username)),
        }
    }

    fn missing(username: &str) -> ApiError {
        ApiError::NotFound(format!("There exists no user '{}'", username))
    }

    fn duplicate(username: &str) -> ApiError {
        ApiError::Conflict(format!(
            "There already exists a user with username '{}'",
            username
        ))
    }
}
