// ABOUTME: User storage layer using SQLite
// ABOUTME: Shares the application database pool; the users table is created by the storage migrations

use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use vibespecs_core::{generate_user_id, now_millis, Plan};

use super::types::{NewUser, StoredUser};
use super::UserDirectory;
use crate::error::{AuthError, AuthResult};

pub struct SqliteUserStorage {
    pool: SqlitePool,
}

impl SqliteUserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &SqliteRow) -> AuthResult<StoredUser> {
        let plan_str: String = row.try_get("plan")?;
        let plan = Plan::from_str(&plan_str).map_err(AuthError::Storage)?;
        let created_at_ms: i64 = row.try_get("created_at")?;
        let created_at = DateTime::from_timestamp_millis(created_at_ms)
            .ok_or_else(|| AuthError::Storage(format!("invalid created_at {}", created_at_ms)))?;

        Ok(StoredUser {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            plan,
            password_hash: row.try_get("password_hash")?,
            created_at,
        })
    }
}

#[async_trait]
impl UserDirectory for SqliteUserStorage {
    async fn create_user(&self, user: NewUser) -> AuthResult<StoredUser> {
        let stored = StoredUser {
            id: generate_user_id(),
            email: user.email.to_lowercase(),
            name: user.name,
            plan: user.plan,
            password_hash: user.password_hash,
            created_at: now_millis(),
        };

        let result = sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, plan, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&stored.id)
        .bind(&stored.email)
        .bind(&stored.name)
        .bind(&stored.password_hash)
        .bind(stored.plan.as_str())
        .bind(stored.created_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Created user {}", stored.id);
                Ok(stored)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::DuplicateEmail(stored.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<StoredUser>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_user(&self, id: &str) -> AuthResult<Option<StoredUser>> {
        debug!("Fetching user: {}", id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}
