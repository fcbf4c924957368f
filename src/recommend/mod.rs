//! Top-N ranking of one user's predicted ratings.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Recommendation;
use crate::store::{check_index, RatingMatrix, Surface};

pub const DEFAULT_TOP_N: usize = 10;

/// Ranks the items of `user`'s prediction row and returns at most `n`
/// `(item id, score)` pairs, highest score first.
///
/// With `exclude_rated` (the usual mode) items the user already rated are
/// dropped before ranking; the shared surface itself is never mutated.
/// Remaining not-computed cells sort last and may appear in the result,
/// where the presentation layer is expected to skip them. Ties are broken
/// by ascending item index, so the ordering is deterministic.
pub fn top_n(
    predictions: &Surface,
    matrix: &RatingMatrix,
    user: usize,
    n: usize,
    exclude_rated: bool,
) -> Result<Vec<Recommendation>> {
    if n == 0 {
        return Err(Error::ZeroParameter { name: "top_n" });
    }
    let expected = (matrix.n_users(), matrix.n_items());
    if predictions.shape() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            actual: predictions.shape(),
        });
    }
    check_index("user", user, matrix.n_users())?;

    // Work on a private copy of the row; the shared surface is never mutated.
    let row = predictions.values().row(user).to_vec();
    let mut excluded = 0usize;
    let mut candidates: Vec<(usize, f64)> = row
        .into_iter()
        .enumerate()
        .filter(|&(item, _)| {
            if exclude_rated && matrix.is_rated(user, item) {
                excluded += 1;
                false
            } else {
                true
            }
        })
        .collect();

    candidates.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => a.0.cmp(&b.0),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .1
            .partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0)),
    });
    candidates.truncate(n);

    debug!(user, n, excluded, "ranked prediction row");

    candidates
        .into_iter()
        .map(|(item, score)| {
            let item_id = matrix
                .items()
                .id_of(item)
                .ok_or(Error::IndexOutOfBounds {
                    axis: "item",
                    index: item,
                    len: matrix.n_items(),
                })?
                .to_string();
            Ok(Recommendation { item_id, score })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use crate::store::NOT_COMPUTED;
    use ndarray::array;

    fn sample_matrix() -> RatingMatrix {
        RatingMatrix::from_ratings(&[
            Rating::new("u0", "i0", 5.0),
            Rating::new("u0", "i1", 3.0),
            Rating::new("u1", "i0", 4.0),
            Rating::new("u1", "i2", 2.0),
            Rating::new("u2", "i1", 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rated_items_never_recommended_even_with_top_score() {
        let matrix = sample_matrix();
        // Item 0 carries the highest raw score for user 0 but is rated.
        let predictions = Surface::from_values(array![
            [9.0, 8.0, 4.5],
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0]
        ]);
        let recommendations = top_n(&predictions, &matrix, 0, 1, true).unwrap();
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].item_id, "i2");
        assert_eq!(recommendations[0].score, 4.5);
    }

    #[test]
    fn test_include_rated_returns_surface_scores() {
        let matrix = sample_matrix();
        let predictions = Surface::from_values(array![
            [9.0, 8.0, 4.5],
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0]
        ]);
        let recommendations = top_n(&predictions, &matrix, 0, 3, false).unwrap();
        assert_eq!(recommendations.len(), 3);
        assert_eq!(recommendations[0].item_id, "i0");
        assert_eq!(recommendations[0].score, 9.0);
    }

    #[test]
    fn test_ties_break_by_ascending_item_index() {
        let matrix = sample_matrix();
        let predictions = Surface::from_values(array![
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
            [4.0, 4.0, 4.0]
        ]);
        let recommendations = top_n(&predictions, &matrix, 2, 2, true).unwrap();
        // User 2 rated item 1; remaining candidates 0 and 2 tie at 4.0.
        assert_eq!(recommendations[0].item_id, "i0");
        assert_eq!(recommendations[1].item_id, "i2");
    }

    #[test]
    fn test_returns_fewer_when_candidates_run_out() {
        let matrix = sample_matrix();
        let predictions = Surface::from_values(array![
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0]
        ]);
        let recommendations = top_n(&predictions, &matrix, 0, 10, true).unwrap();
        assert_eq!(recommendations.len(), 1);
    }

    #[test]
    fn test_not_computed_cells_rank_last() {
        let matrix = sample_matrix();
        let predictions = Surface::from_values(array![
            [1.0, 2.0, NOT_COMPUTED],
            [1.0, 2.0, 3.0],
            [NOT_COMPUTED, 2.0, 0.5]
        ]);
        let recommendations = top_n(&predictions, &matrix, 2, 2, true).unwrap();
        assert_eq!(recommendations[0].item_id, "i2");
        assert!(recommendations[1].score.is_nan());
        assert_eq!(recommendations[1].item_id, "i0");
    }

    #[test]
    fn test_preconditions_rejected() {
        let matrix = sample_matrix();
        let predictions = Surface::not_computed(3, 3);
        assert!(matches!(
            top_n(&predictions, &matrix, 0, 0, true),
            Err(Error::ZeroParameter { .. })
        ));
        assert!(matches!(
            top_n(&predictions, &matrix, 9, 1, true),
            Err(Error::IndexOutOfBounds { .. })
        ));
        let wrong_shape = Surface::not_computed(2, 2);
        assert!(matches!(
            top_n(&wrong_shape, &matrix, 0, 1, true),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
