//! Movie catalog queries
//!
//! "Excluded" movies for a user are those with a watch-history row where
//! `watched = 1 OR ignored = 1`. Liking alone never excludes a movie.

use super::models::{MovieSummary, NewMovie, TaggedMovie};
use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Maximum rows returned by a title search
pub const SEARCH_LIMIT: i64 = 10;

/// True when the movies table has no rows
pub async fn catalog_is_empty(pool: &SqlitePool) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM movies)")
        .fetch_one(pool)
        .await?;
    Ok(!exists)
}

/// Number of movies in the catalog
pub async fn movie_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert catalog rows in a single transaction, returning their new ids
pub async fn insert_movies(pool: &SqlitePool, movies: &[NewMovie]) -> Result<Vec<i64>> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(movies.len());

    for movie in movies {
        let done = sqlx::query(
            r#"
            INSERT INTO movies (
                poster_link, title, year, certificate, runtime, genre, imdb_rating,
                overview, meta_score, director, star1, star2, star3, star4, similarity_tags
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&movie.poster_link)
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.certificate)
        .bind(&movie.runtime)
        .bind(&movie.genre)
        .bind(movie.imdb_rating)
        .bind(&movie.overview)
        .bind(movie.meta_score)
        .bind(&movie.director)
        .bind(&movie.star1)
        .bind(&movie.star2)
        .bind(&movie.star3)
        .bind(&movie.star4)
        .bind(&movie.similarity_tags)
        .execute(&mut *tx)
        .await?;

        ids.push(done.last_insert_rowid());
    }

    tx.commit().await?;
    debug!(count = ids.len(), "Inserted catalog rows");
    Ok(ids)
}

/// Look up a single movie
pub async fn get_movie(pool: &SqlitePool, movie_id: i64) -> Result<Option<MovieSummary>> {
    let movie = sqlx::query_as::<_, MovieSummary>("SELECT id, title FROM movies WHERE id = ?")
        .bind(movie_id)
        .fetch_optional(pool)
        .await?;
    Ok(movie)
}

/// Case-insensitive title substring search, skipping movies the user ignored
pub async fn search_titles(
    pool: &SqlitePool,
    fragment: &str,
    user_id: i64,
) -> Result<Vec<MovieSummary>> {
    let pattern = format!("%{}%", escape_like(fragment));

    let movies = sqlx::query_as::<_, MovieSummary>(
        r#"
        SELECT m.id, m.title
        FROM movies m
        WHERE m.title LIKE ? ESCAPE '\'
          AND NOT EXISTS (
              SELECT 1 FROM watch_history wh
              WHERE wh.movie_id = m.id AND wh.user_id = ? AND wh.ignored = 1
          )
        ORDER BY m.id
        LIMIT ?
        "#,
    )
    .bind(pattern)
    .bind(user_id)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

/// Pivot movie plus every movie the user has neither watched nor ignored,
/// in id order
pub async fn fetch_candidate_pool(
    pool: &SqlitePool,
    pivot_movie_id: i64,
    user_id: i64,
) -> Result<Vec<TaggedMovie>> {
    let movies = sqlx::query_as::<_, TaggedMovie>(
        r#"
        SELECT m.id, m.title, COALESCE(m.similarity_tags, '') AS similarity_tags
        FROM movies m
        WHERE m.id = ?
           OR NOT EXISTS (
              SELECT 1 FROM watch_history wh
              WHERE wh.movie_id = m.id AND wh.user_id = ?
                AND (wh.watched = 1 OR wh.ignored = 1)
           )
        ORDER BY m.id
        "#,
    )
    .bind(pivot_movie_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    debug!(pivot_movie_id, user_id, pool_size = movies.len(), "Fetched candidate pool");
    Ok(movies)
}

/// First `limit` movies by id that the user has neither watched nor ignored
pub async fn fetch_fallback_pool(
    pool: &SqlitePool,
    user_id: i64,
    limit: usize,
) -> Result<Vec<MovieSummary>> {
    let movies = sqlx::query_as::<_, MovieSummary>(
        r#"
        SELECT m.id, m.title
        FROM movies m
        WHERE NOT EXISTS (
            SELECT 1 FROM watch_history wh
            WHERE wh.movie_id = m.id AND wh.user_id = ?
              AND (wh.watched = 1 OR wh.ignored = 1)
        )
        ORDER BY m.id
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
