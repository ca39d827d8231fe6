//! Recommender running on the SQLite catalog
//!
//! Similarity tags are produced by the normalizer exactly as catalog
//! ingestion does, so these tests exercise the full tag-to-ranking path.

use mvb_common::config::RecommendationSettings;
use mvb_common::db::{self, movies, users, watch_history, NewMovie, WatchFlags};
use mvb_rec::{Reason, Recommender, SqliteCatalog, TextNormalizer};
use sqlx::SqlitePool;
use std::collections::HashSet;
use tempfile::TempDir;

async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().unwrap();
    let pool = db::init_database(&temp_dir.path().join("rec.db")).await.unwrap();
    (temp_dir, pool)
}

/// Insert (title, genre, overview) rows with normalized similarity tags
async fn seed_catalog(pool: &SqlitePool, rows: &[(&str, &str, &str)]) -> Vec<i64> {
    let normalizer = TextNormalizer::new();
    let movies: Vec<NewMovie> = rows
        .iter()
        .map(|(title, genre, overview)| NewMovie {
            title: title.to_string(),
            genre: genre.to_string(),
            overview: overview.to_string(),
            similarity_tags: normalizer.similarity_tag(genre, overview),
            ..Default::default()
        })
        .collect();
    movies::insert_movies(pool, &movies).await.unwrap()
}

fn flags(watched: bool, liked: bool, ignored: bool) -> WatchFlags {
    WatchFlags { watched, liked, ignored }
}

const CATALOG: &[(&str, &str, &str)] = &[
    ("Deep Blue", "Adventure", "Sailors battle a storm on the open ocean."),
    ("Dune Riders", "Adventure", "Nomads cross the desert on camels."),
    ("Storm Surge", "Adventure", "A ship's crew survives an ocean storm."),
    ("Sand Kings", "Drama", "A caravan of camels crosses the burning desert."),
    ("Paris Nights", "Romance", "Two strangers fall in love in Paris."),
    ("The Reef", "Adventure", "Divers explore a reef in the ocean."),
    ("Kitchen Wars", "Comedy", "Rival chefs open restaurants on the same street."),
];

#[tokio::test]
async fn test_similar_movies_from_sqlite() {
    let (_tmp, pool) = create_test_db().await;
    seed_catalog(&pool, CATALOG).await;
    let user = users::create_user(&pool, "alice").await.unwrap();

    let rec = Recommender::with_seed(SqliteCatalog::new(pool), RecommendationSettings::default(), 3);
    let similar = rec.get_similar_movies(1, user.id, 2).await.unwrap();
    let titles: Vec<&str> = similar.iter().map(|m| m.title.as_str()).collect();

    assert_eq!(titles, vec!["Storm Surge", "The Reef"]);
}

#[tokio::test]
async fn test_watched_movies_leave_the_pool() {
    let (_tmp, pool) = create_test_db().await;
    seed_catalog(&pool, CATALOG).await;
    let user = users::create_user(&pool, "bob").await.unwrap();
    watch_history::upsert_watch_record(&pool, user.id, 3, flags(true, false, false))
        .await
        .unwrap();
    watch_history::upsert_watch_record(&pool, user.id, 6, flags(false, false, true))
        .await
        .unwrap();

    let rec = Recommender::with_seed(SqliteCatalog::new(pool), RecommendationSettings::default(), 3);
    let similar = rec.get_similar_movies(1, user.id, 10).await.unwrap();
    let ids: HashSet<i64> = similar.iter().map(|m| m.id).collect();

    assert_eq!(ids, HashSet::from([2, 4, 5, 7]));
}

#[tokio::test]
async fn test_history_recommendations_from_sqlite() {
    let (_tmp, pool) = create_test_db().await;
    seed_catalog(&pool, CATALOG).await;
    let user = users::create_user(&pool, "carol").await.unwrap();
    watch_history::upsert_watch_record(&pool, user.id, 1, flags(true, true, false))
        .await
        .unwrap();

    let mut rec = Recommender::with_seed(SqliteCatalog::new(pool), RecommendationSettings::default(), 11);
    let recommendations = rec.recommend_from_history(user.id).await.unwrap();

    assert_eq!(recommendations.len(), 6);
    assert!(recommendations.iter().all(|r| r.movie_id != 1));

    let similar: HashSet<i64> = recommendations
        .iter()
        .filter(|r| r.reason == Reason::SimilarTo("Deep Blue".to_string()))
        .map(|r| r.movie_id)
        .collect();
    assert_eq!(similar.len(), 3);
    assert!(similar.contains(&3));
    assert!(similar.contains(&6));
}
