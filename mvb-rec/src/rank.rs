//! Cosine similarity ranking relative to a pivot row
//!
//! Every row (the pivot included) gets a score. Rows are ordered by score
//! descending; equal scores keep their original row order, except that the
//! pivot's own entry is placed ahead of any row it ties with. The pivot is
//! therefore always the first entry: its self-score is exactly 1.0 when its
//! vector is non-zero, and a zero vector scores 0.0 against every row.
//!
//! The ranker does not remove the pivot; callers skip it.

use ndarray::{Array1, Array2, Axis};

/// Row index paired with its similarity to the pivot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub row: usize,
    pub score: f64,
}

/// Cosine similarity of every row against `pivot_row`
///
/// Rows with a zero vector score 0.0. Panics if `pivot_row` is out of range.
pub fn cosine_scores(matrix: &Array2<f64>, pivot_row: usize) -> Vec<f64> {
    assert!(
        pivot_row < matrix.nrows(),
        "pivot row {} outside pool of {} rows",
        pivot_row,
        matrix.nrows()
    );

    let pivot = matrix.row(pivot_row);
    let pivot_norm = pivot.dot(&pivot).sqrt();
    let dots: Array1<f64> = matrix.dot(&pivot);
    let norms = matrix.map_axis(Axis(1), |row| row.dot(&row).sqrt());

    dots.iter()
        .zip(norms.iter())
        .enumerate()
        .map(|(row, (&dot, &norm))| {
            if pivot_norm == 0.0 || norm == 0.0 {
                0.0
            } else if row == pivot_row {
                1.0
            } else {
                (dot / (pivot_norm * norm)).min(1.0)
            }
        })
        .collect()
}

/// Full descending-similarity ordering of the pool relative to `pivot_row`
pub fn rank_by_similarity(matrix: &Array2<f64>, pivot_row: usize) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = cosine_scores(matrix, pivot_row)
        .into_iter()
        .enumerate()
        .map(|(row, score)| RankedCandidate { row, score })
        .collect();

    // Stable sort: ties keep ascending row order
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| (a.row != pivot_row).cmp(&(b.row != pivot_row)))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_identical_and_orthogonal_rows() {
        let matrix = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let scores = cosine_scores(&matrix, 0);

        assert_eq!(scores[0], 1.0);
        assert!((scores[1] - 1.0).abs() < 1e-12);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let matrix = array![[1.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let scores = cosine_scores(&matrix, 0);

        assert!((scores[1] - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_descending_with_pivot_first() {
        let matrix = array![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [2.0, 0.0]];
        let ranked = rank_by_similarity(&matrix, 2);

        let rows: Vec<usize> = ranked.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 3, 1, 0]);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let matrix = array![[1.0, 0.0], [0.0, 1.0], [0.0, 2.0], [0.0, 3.0]];
        let ranked = rank_by_similarity(&matrix, 0);

        let rows: Vec<usize> = ranked.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_pivot_ahead_of_identical_earlier_row() {
        let matrix = array![[3.0, 4.0], [3.0, 4.0]];
        let ranked = rank_by_similarity(&matrix, 1);

        assert_eq!(ranked[0].row, 1);
        assert_eq!(ranked[1].row, 0);
    }

    #[test]
    fn test_zero_pivot_scores_zero_everywhere() {
        let matrix = array![[1.0, 0.0], [0.0, 0.0], [0.0, 1.0]];
        let ranked = rank_by_similarity(&matrix, 1);

        assert!(ranked.iter().all(|r| r.score == 0.0));
        let rows: Vec<usize> = ranked.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let matrix = Array2::<f64>::zeros((3, 0));
        let ranked = rank_by_similarity(&matrix, 0);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].row, 0);
    }

    #[test]
    #[should_panic(expected = "pivot row")]
    fn test_pivot_out_of_range_panics() {
        let matrix = array![[1.0]];
        rank_by_similarity(&matrix, 5);
    }
}
