//! Recommendation blender
//!
//! Two operations:
//! - [`Recommender::get_similar_movies`]: rank one pivot's candidate pool by
//!   tag similarity and return the closest movies.
//! - [`Recommender::recommend_from_history`]: query similar movies for each
//!   liked movie, backfill from the top-ten fallback, shuffle and truncate.
//!
//! Vocabulary and vectors are recomputed for every pool; nothing is cached.

use crate::rank::rank_by_similarity;
use crate::store::CatalogStore;
use crate::vectorize::CountVectorizer;
use mvb_common::config::RecommendationSettings;
use mvb_common::db::{MovieSummary, TaggedMovie};
use mvb_common::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// A movie ranked against a pivot
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMovie {
    pub id: i64,
    pub title: String,
    pub score: f64,
}

impl From<SimilarMovie> for MovieSummary {
    fn from(movie: SimilarMovie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title,
        }
    }
}

/// Why a movie was recommended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Similar to a movie the user liked (holds the liked title)
    SimilarTo(String),
    /// Backfilled from the first ten eligible catalog movies
    TopTen,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::SimilarTo(title) => write!(f, "similar to movie \"{}\"", title),
            Reason::TopTen => write!(f, "because it's a top ten movie."),
        }
    }
}

/// One entry of a watch-history recommendation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub reason: Reason,
    pub movie_id: i64,
}

impl Recommendation {
    pub fn reason_text(&self) -> String {
        self.reason.to_string()
    }
}

/// Rank a candidate pool against its pivot and keep the `count` closest
/// movies, pivot excluded
///
/// Pools of fewer than two movies have nothing to compare and yield an empty
/// list. Panics if the pivot is not part of the pool.
pub fn rank_pool(
    pool: &[TaggedMovie],
    pivot_movie_id: i64,
    count: usize,
    max_features: usize,
) -> Vec<SimilarMovie> {
    if pool.is_empty() {
        return Vec::new();
    }

    let pivot_row = pool
        .iter()
        .position(|movie| movie.id == pivot_movie_id)
        .unwrap_or_else(|| panic!("pivot movie {} missing from its own candidate pool", pivot_movie_id));

    if pool.len() < 2 || count == 0 {
        return Vec::new();
    }

    let tags: Vec<&str> = pool.iter().map(|m| m.similarity_tags.as_str()).collect();
    let matrix = CountVectorizer::new()
        .with_max_features(max_features)
        .fit_transform(&tags);

    rank_by_similarity(&matrix, pivot_row)
        .into_iter()
        .filter(|ranked| ranked.row != pivot_row)
        .take(count)
        .map(|ranked| {
            let movie = &pool[ranked.row];
            SimilarMovie {
                id: movie.id,
                title: movie.title.clone(),
                score: ranked.score,
            }
        })
        .collect()
}

/// Content-similarity recommender over a [`CatalogStore`]
pub struct Recommender<S> {
    store: S,
    settings: RecommendationSettings,
    rng: StdRng,
}

impl<S: CatalogStore> Recommender<S> {
    /// Recommender with an entropy-seeded shuffle
    pub fn new(store: S, settings: RecommendationSettings) -> Self {
        Self {
            store,
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    /// Recommender with a reproducible shuffle
    pub fn with_seed(store: S, settings: RecommendationSettings, seed: u64) -> Self {
        Self {
            store,
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The `count` movies most similar to the pivot, most similar first,
    /// with their scores
    pub async fn similar_movies_scored(
        &self,
        pivot_movie_id: i64,
        user_id: i64,
        count: usize,
    ) -> Result<Vec<SimilarMovie>> {
        let pool = self.store.fetch_candidate_pool(pivot_movie_id, user_id).await?;
        let similar = rank_pool(&pool, pivot_movie_id, count, self.settings.max_features);

        debug!(
            pivot_movie_id,
            user_id,
            pool_size = pool.len(),
            returned = similar.len(),
            "Ranked similar movies"
        );
        Ok(similar)
    }

    /// The `count` movies most similar to the pivot, excluding the pivot and
    /// anything the user watched or ignored
    pub async fn get_similar_movies(
        &self,
        pivot_movie_id: i64,
        user_id: i64,
        count: usize,
    ) -> Result<Vec<MovieSummary>> {
        let similar = self.similar_movies_scored(pivot_movie_id, user_id, count).await?;
        Ok(similar.into_iter().map(MovieSummary::from).collect())
    }

    /// Up to `result_count` recommendations blended from liked movies and the
    /// top-ten fallback, in random order
    pub async fn recommend_from_history(&mut self, user_id: i64) -> Result<Vec<Recommendation>> {
        let result_count = self.settings.result_count;
        let liked = self.store.fetch_liked_movies(user_id).await?;

        let mut recommendations = Vec::new();
        let mut seen = HashSet::new();

        for liked_movie in &liked {
            let similar = self
                .get_similar_movies(liked_movie.id, user_id, self.settings.similar_per_liked)
                .await?;

            for movie in similar {
                if seen.insert(movie.id) {
                    recommendations.push(Recommendation {
                        title: movie.title,
                        reason: Reason::SimilarTo(liked_movie.title.clone()),
                        movie_id: movie.id,
                    });
                }
            }
        }

        let from_liked = recommendations.len();
        if from_liked < result_count {
            let mut fallback = self
                .store
                .fetch_fallback_pool(user_id, self.settings.fallback_pool_limit)
                .await?;
            fallback.shuffle(&mut self.rng);

            let needed = result_count - from_liked;
            let backfill: Vec<Recommendation> = fallback
                .into_iter()
                .filter(|movie| seen.insert(movie.id))
                .take(needed)
                .map(|movie| Recommendation {
                    title: movie.title,
                    reason: Reason::TopTen,
                    movie_id: movie.id,
                })
                .collect();
            recommendations.extend(backfill);
        }

        recommendations.shuffle(&mut self.rng);
        recommendations.truncate(result_count);

        info!(
            user_id,
            liked = liked.len(),
            from_liked,
            returned = recommendations.len(),
            "Built watch-history recommendations"
        );
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(id: i64, tags: &str) -> TaggedMovie {
        TaggedMovie {
            id,
            title: format!("Movie {}", id),
            similarity_tags: tags.to_string(),
        }
    }

    #[test]
    fn test_reason_text() {
        assert_eq!(
            Reason::SimilarTo("Alien".to_string()).to_string(),
            "similar to movie \"Alien\""
        );
        assert_eq!(Reason::TopTen.to_string(), "because it's a top ten movie.");
    }

    #[test]
    fn test_rank_pool_excludes_pivot_and_orders_by_similarity() {
        let pool = vec![
            tagged(1, "space alien horror"),
            tagged(2, "romance paris"),
            tagged(3, "space alien comedy"),
            tagged(4, "space documentary"),
        ];

        let similar = rank_pool(&pool, 1, 3, 10_000);
        let ids: Vec<i64> = similar.iter().map(|m| m.id).collect();

        assert_eq!(ids, vec![3, 4, 2]);
        assert!(similar[0].score > similar[1].score);
        assert_eq!(similar[2].score, 0.0);
    }

    #[test]
    fn test_rank_pool_truncates_to_count() {
        let pool = vec![tagged(1, "war"), tagged(2, "war"), tagged(3, "war"), tagged(4, "war")];
        let similar = rank_pool(&pool, 2, 2, 10_000);

        let ids: Vec<i64> = similar.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_rank_pool_small_pools_are_empty() {
        assert!(rank_pool(&[], 1, 3, 10_000).is_empty());
        assert!(rank_pool(&[tagged(1, "war")], 1, 3, 10_000).is_empty());
    }

    #[test]
    fn test_rank_pool_zero_pivot_never_returns_pivot() {
        let pool = vec![tagged(1, "western"), tagged(2, ""), tagged(3, "musical")];
        let similar = rank_pool(&pool, 2, 5, 10_000);

        let ids: Vec<i64> = similar.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    #[should_panic(expected = "missing from its own candidate pool")]
    fn test_rank_pool_missing_pivot_panics() {
        let pool = vec![tagged(1, "war"), tagged(2, "peace")];
        rank_pool(&pool, 99, 3, 10_000);
    }
}
