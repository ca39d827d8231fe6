//! # MVB Recommendation Engine
//!
//! Content-similarity recommendations over the movie catalog:
//! - [`normalize`]: canonical similarity tags from genre and overview text
//! - [`vectorize`]: per-pool bag-of-words count vectors
//! - [`rank`]: cosine similarity ordering against a pivot movie
//! - [`blend`]: similar-movie lookup and watch-history recommendations
//! - [`store`]: storage queries the recommender depends on

pub mod blend;
pub mod lemma;
pub mod normalize;
pub mod rank;
pub mod stopwords;
pub mod store;
pub mod vectorize;

pub use blend::{rank_pool, Reason, Recommendation, Recommender, SimilarMovie};
pub use normalize::TextNormalizer;
pub use store::{CatalogStore, SqliteCatalog};
