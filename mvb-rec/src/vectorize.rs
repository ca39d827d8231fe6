//! Bag-of-words count vectorizer
//!
//! Fits a vocabulary on a pool of documents and produces one row of term
//! counts per document. The vocabulary is rebuilt on every call to
//! [`CountVectorizer::fit_transform`]; nothing is carried between pools.
//!
//! Tokens are runs of two or more word characters (alphanumerics and `_`),
//! lowercased, with the vectorizer stop word list removed. When the number
//! of distinct terms exceeds `max_features`, the most frequent terms across
//! the whole pool are kept (ties broken alphabetically). Columns are ordered
//! alphabetically by term.
//!
//! Row `i` of the output always corresponds to document `i` of the input.

use crate::stopwords::StopWords;
use ndarray::Array2;
use std::collections::HashMap;
use tracing::debug;

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 10_000;

/// Count vectorizer with a bounded vocabulary
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    max_features: usize,
    stop_words: Option<&'static StopWords>,
    vocabulary: Vec<String>,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: Some(StopWords::vectorizer()),
            vocabulary: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Disable stop word filtering
    #[must_use]
    pub fn without_stop_words(mut self) -> Self {
        self.stop_words = None;
        self
    }

    /// Terms of the last fitted vocabulary, in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Fit a fresh vocabulary on `documents` and return their count matrix
    /// (`documents.len()` rows, one column per vocabulary term)
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Array2<f64> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.tokenize(doc.as_ref()))
            .collect();

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                *term_freq.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(&str, usize)> = term_freq.into_iter().collect();
        if terms.len() > self.max_features {
            terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            terms.truncate(self.max_features);
        }

        let mut vocabulary: Vec<String> = terms.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let columns: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.as_str(), idx))
            .collect();

        let mut matrix = Array2::<f64>::zeros((documents.len(), vocabulary.len()));
        for (row, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                if let Some(&col) = columns.get(token.as_str()) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }

        debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "Vectorized pool"
        );

        self.vocabulary = vocabulary;
        matrix
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .filter(|token| self.stop_words.map_or(true, |sw| !sw.contains(token)))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_input_order() {
        let mut vectorizer = CountVectorizer::new();
        let matrix = vectorizer.fit_transform(&["space robot", "robot robot", "pirate ship"]);

        assert_eq!(matrix.nrows(), 3);
        assert_eq!(vectorizer.vocabulary(), &["pirate", "robot", "ship", "space"]);
        assert_eq!(matrix.row(0).to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(matrix.row(1).to_vec(), vec![0.0, 2.0, 0.0, 0.0]);
        assert_eq!(matrix.row(2).to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_drops_single_character_tokens_and_stop_words() {
        let mut vectorizer = CountVectorizer::new();
        vectorizer.fit_transform(&["a x hero and the villain", "afterwards z"]);

        assert_eq!(vectorizer.vocabulary(), &["hero", "villain"]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent_terms() {
        let mut vectorizer = CountVectorizer::new().with_max_features(2);
        let matrix = vectorizer.fit_transform(&["war war peace", "war love", "love zebra"]);

        assert_eq!(vectorizer.vocabulary(), &["love", "war"]);
        assert_eq!(matrix.ncols(), 2);
        assert_eq!(matrix.row(0).to_vec(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_max_features_ties_broken_alphabetically() {
        let mut vectorizer = CountVectorizer::new().with_max_features(2);
        vectorizer.fit_transform(&["delta charlie bravo alpha"]);

        assert_eq!(vectorizer.vocabulary(), &["alpha", "bravo"]);
    }

    #[test]
    fn test_refits_on_every_call() {
        let mut vectorizer = CountVectorizer::new();
        vectorizer.fit_transform(&["western outlaw"]);
        vectorizer.fit_transform(&["musical dance"]);

        assert_eq!(vectorizer.vocabulary(), &["dance", "musical"]);
    }

    #[test]
    fn test_empty_pool_and_empty_documents() {
        let mut vectorizer = CountVectorizer::new();
        let empty: [&str; 0] = [];
        assert_eq!(vectorizer.fit_transform(&empty).dim(), (0, 0));

        let matrix = vectorizer.fit_transform(&["", ""]);
        assert_eq!(matrix.dim(), (2, 0));
    }

    #[test]
    fn test_without_stop_words_keeps_everything() {
        let mut vectorizer = CountVectorizer::new().without_stop_words();
        vectorizer.fit_transform(&["the hero"]);

        assert_eq!(vectorizer.vocabulary(), &["hero", "the"]);
    }
}
