//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and creates the schema.
//! Table creation is idempotent so startup can always run it.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // One session at a time: a single connection keeps every statement
    // strictly ordered. Foreign keys are needed for cascading user deletes.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_movies_table(pool).await?;
    create_watch_history_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            username VARCHAR(50) NOT NULL UNIQUE,
            last_login TIMESTAMP DEFAULT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_movies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY,
            poster_link TEXT,
            title VARCHAR(100) NOT NULL,
            year INTEGER,
            certificate VARCHAR(20),
            runtime VARCHAR(20),
            genre VARCHAR(100),
            imdb_rating DECIMAL(4,2),
            overview TEXT,
            meta_score INTEGER,
            director VARCHAR(100),
            star1 VARCHAR(100),
            star2 VARCHAR(100),
            star3 VARCHAR(100),
            star4 VARCHAR(100),
            similarity_tags TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_watch_history_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS watch_history (
            user_id INTEGER NOT NULL,
            movie_id INTEGER NOT NULL,
            watched INTEGER NOT NULL CHECK (watched IN (0, 1)),
            liked INTEGER NOT NULL CHECK (liked IN (0, 1)),
            ignored INTEGER NOT NULL CHECK (ignored IN (0, 1)),
            creation_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            last_edited TIMESTAMP DEFAULT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE,
            PRIMARY KEY (user_id, movie_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
