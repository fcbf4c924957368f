//! Low-rank reconstruction of the full rating surface.
//!
//! Row means are computed over rated entries only, subtracted before a
//! truncated singular value decomposition and re-added afterwards, so the
//! factors capture per-user deviations rather than absolute rating scale.
//! The reconstruction is clamped to the rating scale, which also bounds any
//! precision loss from near-degenerate singular vectors on very sparse
//! input.

use nalgebra::{DMatrix, DVector, SVD};
use ndarray::Array2;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::RatingScale;
use crate::store::{RatingMatrix, Surface, UNRATED};

pub const DEFAULT_K_FACTORS: usize = 20;

/// Reconstructs a complete, clamped prediction surface with the top
/// `k_factors` singular values.
///
/// `k_factors` must be positive and strictly less than
/// `min(n_users, n_items)`.
pub fn predict_surface(
    matrix: &RatingMatrix,
    k_factors: usize,
    scale: RatingScale,
) -> Result<Surface> {
    if k_factors == 0 {
        return Err(Error::ZeroParameter { name: "k_factors" });
    }
    let n_users = matrix.n_users();
    let n_items = matrix.n_items();
    let limit = n_users.min(n_items);
    if k_factors >= limit {
        return Err(Error::FactorRankTooLarge {
            k: k_factors,
            limit,
        });
    }
    if !scale.min.is_finite() || !scale.max.is_finite() || scale.min >= scale.max {
        return Err(Error::InvalidRatingScale {
            min: scale.min,
            max: scale.max,
        });
    }

    let values = matrix.values();
    let row_means: Vec<f64> = (0..n_users).map(|user| {
        let row = values.row(user);
        let rated: Vec<f64> = row.iter().copied().filter(|&v| v != UNRATED).collect();
        if rated.is_empty() {
            0.0
        } else {
            rated.iter().sum::<f64>() / rated.len() as f64
        }
    }).collect();

    let mut centered = DMatrix::from_row_iterator(n_users, n_items, values.iter().copied());
    for user in 0..n_users {
        for item in 0..n_items {
            centered[(user, item)] -= row_means[user];
        }
    }

    // Singular values come back ordered largest first.
    let svd = SVD::new(centered, true, true);
    let u = svd.u.ok_or(Error::DecompositionFailed { factor: "U" })?;
    let v_t = svd.v_t.ok_or(Error::DecompositionFailed { factor: "V^T" })?;
    let retained: DVector<f64> = svd.singular_values.rows(0, k_factors).into_owned();
    let reconstruction =
        u.columns(0, k_factors) * DMatrix::from_diagonal(&retained) * v_t.rows(0, k_factors);

    let surface = Array2::from_shape_fn((n_users, n_items), |(user, item)| {
        scale.clamp(reconstruction[(user, item)] + row_means[user])
    });

    info!(
        k_factors,
        n_users, n_items, "reconstructed rating surface via truncated SVD"
    );
    Ok(Surface::from_values(surface))
}
