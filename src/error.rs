use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Precondition violations and unrecoverable numeric failures.
///
/// Degenerate data (cold users, all-zero neighborhoods) is never reported
/// through this type; those cases resolve via documented fallbacks.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("{axis} index {index} out of range (length {len})")]
    IndexOutOfBounds {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("unknown {axis} id: {id}")]
    UnknownId { axis: &'static str, id: String },

    #[error("duplicate {axis} id: {id}")]
    DuplicateId { axis: &'static str, id: String },

    #[error("invalid rating {value} for ({user_id}, {item_id}): must be finite and positive")]
    InvalidRating {
        user_id: String,
        item_id: String,
        value: f64,
    },

    #[error("rating list is empty")]
    EmptyRatings,

    #[error("{name} must be greater than zero")]
    ZeroParameter { name: &'static str },

    #[error("k_factors {k} must be less than min(n_users, n_items) = {limit}")]
    FactorRankTooLarge { k: usize, limit: usize },

    #[error("invalid rating scale [{min}, {max}]")]
    InvalidRatingScale { min: f64, max: f64 },

    #[error("prediction at ({row}, {col}) was never computed")]
    NotComputed { row: usize, col: usize },

    #[error("singular value decomposition did not produce {factor}")]
    DecompositionFailed { factor: &'static str },
}
