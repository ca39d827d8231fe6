//! Text normalizer for similarity tags
//!
//! Steps, in order:
//! 1. lowercase
//! 2. strip every character that is neither alphanumeric nor whitespace
//! 3. split on whitespace
//! 4. drop stop words
//! 5. lemmatize each remaining token, keeping the surface form when its
//!    lemma is a stop word ("thats" stays "thats", not "that")
//! 6. rejoin with single spaces
//!
//! # Examples
//!
//! ```
//! use mvb_rec::normalize::normalize_text;
//!
//! let tag = normalize_text("Action, Adventure. A group of heroes!");
//! assert_eq!(tag, "action adventure group hero");
//! ```

use crate::lemma::lemmatize;
use crate::stopwords::StopWords;

/// Converts raw text into a canonical token stream
#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    stop_words: &'static StopWords,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            stop_words: StopWords::normalizer(),
        }
    }

    /// Normalize one text field. Empty or punctuation-only input yields "".
    pub fn normalize(&self, text: &str) -> String {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(token))
            .map(|token| {
                let lemma = lemmatize(token);
                // A lemma that is itself a stop word would vanish on the next pass
                if self.stop_words.contains(&lemma) {
                    token.to_string()
                } else {
                    lemma
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Similarity tag for a catalog row: genre followed by overview
    pub fn similarity_tag(&self, genre: &str, overview: &str) -> String {
        self.normalize(&format!("{} {}", genre, overview))
    }
}

/// Normalize with the default stop word list
pub fn normalize_text(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize_text("Crime, Drama!"), "crime drama");
    }

    #[test]
    fn test_removes_stop_words() {
        assert_eq!(normalize_text("The rise and fall of an empire"), "rise fall empire");
    }

    #[test]
    fn test_lemmatizes_tokens() {
        assert_eq!(normalize_text("Two detectives hunt serial killers"), "two detective hunt serial killer");
    }

    #[test]
    fn test_apostrophes_removed_before_stop_words() {
        // "don't" becomes "dont", which is not in the list
        assert_eq!(normalize_text("Don't look"), "dont look");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_text("  space\t\tjourney \n home "), "space journey home");
    }

    #[test]
    fn test_empty_and_punctuation_only_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("...!?"), "");
        assert_eq!(normalize_text("the of and"), "");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize_text("Set in 1940s Berlin"), "set 1940s berlin");
    }

    #[test]
    fn test_similarity_tag_joins_genre_and_overview() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.similarity_tag("Sci-Fi", "Robots rebel against their makers."),
            "scifi robot rebel maker"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Action, Adventure. A group of heroes must save the cities.",
            "A family's journey through the wolves' forest in the 1920s.",
            "Women and children first!",
            "A man who's lost. That's what happens.",
            "She's back",
            "Wills and cans",
        ];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn test_contractions_whose_lemma_is_a_stop_word() {
        assert_eq!(
            normalize_text("A man who's lost. That's what happens."),
            "man whos lost thats happen"
        );
        assert_eq!(normalize_text("She's back"), "shes back");
        assert_eq!(normalize_text("Wills and cans"), "wills cans");
    }
}
