//! Watch history operations
//!
//! A record is keyed by (user, movie) and is upserted, never duplicated.

use super::models::{HistoryEntry, MovieSummary, WatchFlags, WatchRecord};
use crate::{time, Result};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::debug;

/// Insert or overwrite a user's flags for a movie, stamping it as edited now
pub async fn upsert_watch_record(
    pool: &SqlitePool,
    user_id: i64,
    movie_id: i64,
    flags: WatchFlags,
) -> Result<()> {
    upsert_watch_record_at(pool, user_id, movie_id, flags, time::now()).await
}

/// Same as [`upsert_watch_record`] with an explicit edit timestamp
pub async fn upsert_watch_record_at(
    pool: &SqlitePool,
    user_id: i64,
    movie_id: i64,
    flags: WatchFlags,
    edited_at: NaiveDateTime,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, movie_id, watched, liked, ignored, last_edited)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id, movie_id) DO UPDATE SET
            watched = excluded.watched,
            liked = excluded.liked,
            ignored = excluded.ignored,
            last_edited = excluded.last_edited
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(flags.watched)
    .bind(flags.liked)
    .bind(flags.ignored)
    .bind(edited_at)
    .execute(pool)
    .await?;

    debug!(user_id, movie_id, ?flags, "Upserted watch record");
    Ok(())
}

/// Fetch the stored record for one (user, movie) pair
pub async fn get_watch_record(
    pool: &SqlitePool,
    user_id: i64,
    movie_id: i64,
) -> Result<Option<WatchRecord>> {
    let record = sqlx::query_as::<_, WatchRecord>(
        r#"
        SELECT user_id, movie_id, watched, liked, ignored, creation_date, last_edited
        FROM watch_history
        WHERE user_id = ? AND movie_id = ?
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// A user's full history, most recently edited first
pub async fn watch_history(pool: &SqlitePool, user_id: i64) -> Result<Vec<HistoryEntry>> {
    let entries = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT m.id AS movie_id, m.title, wh.watched, wh.liked, wh.ignored
        FROM movies m
        INNER JOIN watch_history wh ON wh.movie_id = m.id
        WHERE wh.user_id = ?
        ORDER BY wh.last_edited IS NULL, wh.last_edited DESC, m.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Movies the user liked and has not ignored, most recently edited first,
/// never-edited rows last
pub async fn fetch_liked_movies(pool: &SqlitePool, user_id: i64) -> Result<Vec<MovieSummary>> {
    let movies = sqlx::query_as::<_, MovieSummary>(
        r#"
        SELECT m.id, m.title
        FROM movies m
        INNER JOIN watch_history wh ON wh.movie_id = m.id
        WHERE wh.user_id = ? AND wh.liked = 1 AND wh.ignored = 0
        ORDER BY wh.last_edited IS NULL, wh.last_edited DESC, m.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(movies)
}
