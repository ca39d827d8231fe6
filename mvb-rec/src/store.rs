//! Storage seam for the recommender
//!
//! The recommender only needs three read queries. They sit behind
//! [`CatalogStore`] so the blending logic can run against SQLite or an
//! in-memory catalog.

use async_trait::async_trait;
use mvb_common::db::{movies, watch_history, MovieSummary, TaggedMovie};
use mvb_common::Result;
use sqlx::SqlitePool;

/// Read access the recommender needs from storage
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Pivot movie plus every movie the user has neither watched nor ignored
    async fn fetch_candidate_pool(&self, pivot_movie_id: i64, user_id: i64) -> Result<Vec<TaggedMovie>>;

    /// Liked and not ignored, most recently edited first, never-edited last
    async fn fetch_liked_movies(&self, user_id: i64) -> Result<Vec<MovieSummary>>;

    /// Up to `limit` movies the user has neither watched nor ignored, by id
    async fn fetch_fallback_pool(&self, user_id: i64, limit: usize) -> Result<Vec<MovieSummary>>;
}

/// [`CatalogStore`] backed by the SQLite database
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn fetch_candidate_pool(&self, pivot_movie_id: i64, user_id: i64) -> Result<Vec<TaggedMovie>> {
        movies::fetch_candidate_pool(&self.pool, pivot_movie_id, user_id).await
    }

    async fn fetch_liked_movies(&self, user_id: i64) -> Result<Vec<MovieSummary>> {
        watch_history::fetch_liked_movies(&self.pool, user_id).await
    }

    async fn fetch_fallback_pool(&self, user_id: i64, limit: usize) -> Result<Vec<MovieSummary>> {
        movies::fetch_fallback_pool(&self.pool, user_id, limit).await
    }
}
