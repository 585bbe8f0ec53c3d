//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use folderhub_core::result::AppResult;
use folderhub_core::types::UserId;
use folderhub_entity::user::{CreateUser, User};

use crate::error::db_error;

/// Repository for user records.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRepository;

impl UserRepository {
    /// Create a new user repository.
    pub fn new() -> Self {
        Self
    }

    /// Find a user by primary key.
    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: UserId,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(
        &self,
        conn: &mut SqliteConnection,
        username: &str,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ? COLLATE NOCASE")
            .bind(username)
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to find user by username"))
    }

    /// Check whether a username is taken (case-insensitive).
    pub async fn exists_by_username(
        &self,
        conn: &mut SqliteConnection,
        username: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? COLLATE NOCASE)",
        )
        .bind(username)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to check username"))
    }

    /// Create a new user.
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        data: &CreateUser,
        now: DateTime<Utc>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, credential, created_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(UserId::new())
        .bind(&data.username)
        .bind(&data.credential)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(db_error("Failed to create user"))
    }
}
