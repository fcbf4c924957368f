//! Pairwise cosine similarity over rows of a rating matrix.
//!
//! Unrated cells are expected to carry the zero sentinel, so they contribute
//! nothing to dot products or norms. Complexity is O(n^2 * m) for n rows of
//! dimension m; this is the scalability ceiling of the neighborhood path,
//! no approximate nearest-neighbor structure is used.

use ndarray::{Array2, ArrayView2};

/// Cosine similarity of two equal-length vectors, defined as `0.0` when
/// either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Full pairwise cosine similarity matrix over the rows of `rows`.
///
/// The result is square and symmetric with entries in `[-1, 1]`. The
/// diagonal is `1` for any row with nonzero norm and `0` for an all-zero
/// row. Pass a transposed view to compare columns instead.
pub fn cosine_similarity_matrix(rows: ArrayView2<f64>) -> Array2<f64> {
    let n = rows.nrows();
    let mut similarities = Array2::zeros((n, n));

    let vectors: Vec<Vec<f64>> = rows.rows().into_iter().map(|r| r.to_vec()).collect();

    for i in 0..n {
        for j in i..n {
            let value = if i == j {
                if vectors[i].iter().any(|&v| v != 0.0) {
                    1.0
                } else {
                    0.0
                }
            } else {
                cosine_similarity(&vectors[i], &vectors[j])
            };
            similarities[[i, j]] = value;
            similarities[[j, i]] = value;
        }
    }

    similarities
}
