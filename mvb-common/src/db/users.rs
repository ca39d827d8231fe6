//! User account operations
//!
//! Each function is a single statement and commits on its own.

use super::models::User;
use crate::{time, Error, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Create a user with a unique username
///
/// Returns `Error::Conflict` if the username is already taken.
pub async fn create_user(pool: &SqlitePool, username: &str) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::InvalidInput("username must not be empty".to_string()));
    }

    let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await;

    match result {
        Ok(done) => {
            info!(username, "Created user");
            Ok(User {
                id: done.last_insert_rowid(),
                username: username.to_string(),
                last_login: None,
            })
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
            Error::Conflict(format!("username '{}' already exists", username)),
        ),
        Err(e) => Err(e.into()),
    }
}

/// Delete a user and (by cascade) their watch history
///
/// Returns false if no such user existed.
pub async fn delete_user(pool: &SqlitePool, username: &str) -> Result<bool> {
    let done = sqlx::query("DELETE FROM users WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await?;

    let deleted = done.rows_affected() > 0;
    if deleted {
        info!(username, "Deleted user");
    }
    Ok(deleted)
}

/// All users in creation order
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT id, username, last_login FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Look up a user by username
pub async fn get_user(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, last_login FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Record a login and return the refreshed user
pub async fn login_user(pool: &SqlitePool, username: &str) -> Result<User> {
    let done = sqlx::query("UPDATE users SET last_login = ? WHERE username = ?")
        .bind(time::now())
        .bind(username)
        .execute(pool)
        .await?;

    if done.rows_affected() == 0 {
        return Err(Error::NotFound(format!("user '{}'", username)));
    }

    get_user(pool, username)
        .await?
        .ok_or_else(|| Error::NotFound(format!("user '{}'", username)))
}
