use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quill_common::models::user::{Role, User};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "user_id, username, email, password_hash, role, created_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn role(&self) -> Role {
        if self.role == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Strip the password hash for client-facing use.
    pub fn into_public(self) -> User {
        let role = self.role();
        User {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            role,
            created_at: self.created_at,
        }
    }
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"INSERT INTO "user" (user_id, username, email, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {}"#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .context("Failed to create user")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" WHERE user_id = $1"#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by id")?;
        Ok(row)
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" WHERE username = $1"#,
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by username")?;
        Ok(row)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" WHERE email = $1"#,
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by email")?;
        Ok(row)
    }

    /// Login lookup: the identifier may be a username or an email.
    pub async fn get_by_login(pool: &PgPool, login: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {} FROM "user" WHERE username = $1 OR email = $1"#,
            USER_COLUMNS
        ))
        .bind(login)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by login")?;
        Ok(row)
    }
}
