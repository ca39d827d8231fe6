//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub last_login: Option<NaiveDateTime>,
}

/// Catalog row as read from the ingest CSV, before insertion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMovie {
    pub poster_link: Option<String>,
    pub title: String,
    pub year: Option<i64>,
    pub certificate: Option<String>,
    pub runtime: Option<String>,
    pub genre: String,
    pub imdb_rating: Option<f64>,
    pub overview: String,
    pub meta_score: Option<i64>,
    pub director: Option<String>,
    pub star1: Option<String>,
    pub star2: Option<String>,
    pub star3: Option<String>,
    pub star4: Option<String>,
    /// Normalized genre + overview text used for similarity
    pub similarity_tags: String,
}

/// Movie identifier and title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
}

/// Movie with its similarity tag, one row of a candidate pool
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaggedMovie {
    pub id: i64,
    pub title: String,
    pub similarity_tags: String,
}

/// The three independent watch-history flags
///
/// Any combination is valid: a movie may be watched, liked and ignored at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchFlags {
    pub watched: bool,
    pub liked: bool,
    pub ignored: bool,
}

/// Full watch-history row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WatchRecord {
    pub user_id: i64,
    pub movie_id: i64,
    #[sqlx(flatten)]
    pub flags: WatchFlags,
    pub creation_date: NaiveDateTime,
    pub last_edited: Option<NaiveDateTime>,
}

/// Watch history line shown to the user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HistoryEntry {
    pub movie_id: i64,
    pub title: String,
    #[sqlx(flatten)]
    pub flags: WatchFlags,
}
