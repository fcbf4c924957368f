//! k-nearest-neighbor weighted-average rating prediction.
//!
//! A single prediction walks the fallback chain: no neighbor rated the
//! counterpart -> target's own mean rating -> `0.0` for a target with no
//! ratings at all; a selected neighborhood whose similarity weights sum to
//! zero degrades to the unweighted mean of the neighbors' ratings. Every
//! path returns a finite value.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::predict::Orientation;
use crate::similarity::{cosine_similarity, cosine_similarity_matrix};
use crate::store::{check_index, RatingMatrix, Surface, UNRATED};

pub const DEFAULT_K_NEIGHBORS: usize = 10;

/// Predicts the rating of `counterpart` by `entity` from the `k` most
/// similar entities that have rated it.
///
/// With [`Orientation::UserBased`] the entity is a user and the counterpart
/// an item; [`Orientation::ItemBased`] swaps the roles.
pub fn predict_one(
    matrix: &RatingMatrix,
    entity: usize,
    counterpart: usize,
    k: usize,
    orientation: Orientation,
) -> Result<f64> {
    if k == 0 {
        return Err(Error::ZeroParameter { name: "k_neighbors" });
    }

    let values = matrix.values();
    let oriented = match orientation {
        Orientation::UserBased => values.view(),
        Orientation::ItemBased => values.t(),
    };
    check_index(orientation.entity_axis(), entity, oriented.nrows())?;
    check_index(orientation.counterpart_axis(), counterpart, oriented.ncols())?;

    let target = oriented.row(entity).to_vec();
    let similarities: Vec<f64> = oriented
        .rows()
        .into_iter()
        .map(|row| cosine_similarity(&target, &row.to_vec()))
        .collect();

    Ok(knn_estimate(&oriented, &similarities, entity, counterpart, k))
}

/// Fills a complete prediction surface, one kNN estimate per cell.
///
/// The pairwise similarity matrix is computed once and shared across all
/// cells; rows are predicted in parallel. The result is aligned to the
/// rating matrix's `(user, item)` index space for both orientations.
pub fn predict_surface(
    matrix: &RatingMatrix,
    k: usize,
    orientation: Orientation,
) -> Result<Surface> {
    if k == 0 {
        return Err(Error::ZeroParameter { name: "k_neighbors" });
    }

    let oriented: Array2<f64> = match orientation {
        Orientation::UserBased => matrix.values().clone(),
        Orientation::ItemBased => matrix.values().t().to_owned(),
    };
    let similarities = cosine_similarity_matrix(oriented.view());

    let n_entities = oriented.nrows();
    let n_counterparts = oriented.ncols();
    let rows: Vec<Vec<f64>> = (0..n_entities)
        .into_par_iter()
        .map(|entity| {
            let entity_sims = similarities.row(entity).to_vec();
            (0..n_counterparts)
                .map(|counterpart| {
                    knn_estimate(&oriented.view(), &entity_sims, entity, counterpart, k)
                })
                .collect()
        })
        .collect();

    let mut predicted = Array2::zeros((n_entities, n_counterparts));
    for (entity, row) in rows.into_iter().enumerate() {
        for (counterpart, value) in row.into_iter().enumerate() {
            predicted[[entity, counterpart]] = value;
        }
    }
    if orientation == Orientation::ItemBased {
        predicted = predicted.reversed_axes().as_standard_layout().to_owned();
    }

    info!(
        k,
        ?orientation,
        n_users = matrix.n_users(),
        n_items = matrix.n_items(),
        "computed neighborhood prediction surface"
    );
    Ok(Surface::from_values(predicted))
}

fn knn_estimate(
    oriented: &ArrayView2<f64>,
    similarities: &[f64],
    entity: usize,
    counterpart: usize,
    k: usize,
) -> f64 {
    let mut neighbors: Vec<(usize, f64)> = (0..oriented.nrows())
        .filter(|&other| oriented[[other, counterpart]] != UNRATED)
        .map(|other| (other, similarities[other]))
        .collect();

    if neighbors.is_empty() {
        let rated: Vec<f64> = oriented
            .row(entity)
            .iter()
            .copied()
            .filter(|&v| v != UNRATED)
            .collect();
        debug!(entity, counterpart, "no rated neighbors, using entity mean");
        if rated.is_empty() {
            return 0.0;
        }
        return rated.iter().sum::<f64>() / rated.len() as f64;
    }

    // Stable sort keeps ties in ascending index order.
    neighbors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    neighbors.truncate(k);

    let weight_sum: f64 = neighbors.iter().map(|&(_, sim)| sim).sum();
    if weight_sum > 0.0 {
        neighbors
            .iter()
            .map(|&(other, sim)| oriented[[other, counterpart]] * sim)
            .sum::<f64>()
            / weight_sum
    } else {
        debug!(entity, counterpart, "zero-weight neighborhood, using unweighted mean");
        neighbors
            .iter()
            .map(|&(other, _)| oriented[[other, counterpart]])
            .sum::<f64>()
            / neighbors.len() as f64
    }
}
