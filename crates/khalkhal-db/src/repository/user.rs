//! # User Repository
//!
//! Database operations for login accounts.
//!
//! A shop deployment has a handful of accounts at most. Passwords are
//! stored as Argon2 hashes; hashing and verification live in the server
//! app, this repository only stores and retrieves the hash.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// A login account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Finds a user by email (the login identifier).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new user.
    ///
    /// Fails with `DbError::UniqueViolation` if the email is taken.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(email = %user.email, "Inserting user");

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts users. Startup seeds an admin account when this is zero.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new user ID.
pub fn generate_user_id() -> String {
    Uuid::new_v4().to_string()
}
