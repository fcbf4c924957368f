//! Accuracy scoring of a prediction surface against held-out ratings.

use tracing::info;

use crate::error::{Error, Result};
use crate::models::EvalScores;
use crate::store::Surface;

/// RMSE and MAE over the cells where `truth` holds an observed rating.
///
/// Both surfaces must share a shape and use the `NaN` missing-marker
/// convention. Every observed truth cell must have a computed prediction;
/// an uncomputed one is a caller contract violation and is rejected. An
/// empty mask scores `(0.0, 0.0)`.
pub fn evaluate(predictions: &Surface, truth: &Surface) -> Result<EvalScores> {
    if predictions.shape() != truth.shape() {
        return Err(Error::ShapeMismatch {
            expected: truth.shape(),
            actual: predictions.shape(),
        });
    }

    let mut squared_sum = 0.0;
    let mut absolute_sum = 0.0;
    let mut count = 0usize;

    for ((row, col), &actual) in truth.values().indexed_iter() {
        if actual.is_nan() {
            continue;
        }
        let predicted = predictions.values()[[row, col]];
        if predicted.is_nan() {
            return Err(Error::NotComputed { row, col });
        }
        let error = predicted - actual;
        squared_sum += error * error;
        absolute_sum += error.abs();
        count += 1;
    }

    if count == 0 {
        return Ok(EvalScores { rmse: 0.0, mae: 0.0 });
    }

    let scores = EvalScores {
        rmse: (squared_sum / count as f64).sqrt(),
        mae: absolute_sum / count as f64,
    };
    info!(
        rmse = scores.rmse,
        mae = scores.mae,
        cells = count,
        "evaluated prediction surface"
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NOT_COMPUTED;
    use ndarray::array;

    #[test]
    fn test_identical_surfaces_score_zero() {
        let truth = Surface::from_values(array![[4.0, NOT_COMPUTED], [NOT_COMPUTED, 2.0]]);
        let predictions = Surface::from_values(array![[4.0, 3.0], [1.0, 2.0]]);
        let scores = evaluate(&predictions, &truth).unwrap();
        assert_eq!(scores.rmse, 0.0);
        assert_eq!(scores.mae, 0.0);
    }

    #[test]
    fn test_rmse_and_mae_over_mask_only() {
        let truth = Surface::from_values(array![[4.0, NOT_COMPUTED], [NOT_COMPUTED, 2.0]]);
        // The masked-out 9.0 must not influence either score.
        let predictions = Surface::from_values(array![[5.0, 9.0], [9.0, 4.0]]);
        let scores = evaluate(&predictions, &truth).unwrap();
        assert!((scores.mae - 1.5).abs() < 1e-12);
        assert!((scores.rmse - (2.5f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_mask_scores_zero() {
        let truth = Surface::not_computed(2, 2);
        let predictions = Surface::from_values(array![[1.0, 2.0], [3.0, 4.0]]);
        let scores = evaluate(&predictions, &truth).unwrap();
        assert_eq!(scores.rmse, 0.0);
        assert_eq!(scores.mae, 0.0);
    }

    #[test]
    fn test_uncomputed_prediction_under_mask_rejected() {
        let truth = Surface::from_values(array![[4.0, NOT_COMPUTED]]);
        let predictions = Surface::not_computed(1, 2);
        assert_eq!(
            evaluate(&predictions, &truth).unwrap_err(),
            Error::NotComputed { row: 0, col: 0 }
        );
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let truth = Surface::not_computed(2, 3);
        let predictions = Surface::not_computed(3, 2);
        assert!(matches!(
            evaluate(&predictions, &truth),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
