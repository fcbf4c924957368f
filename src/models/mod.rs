use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One observed rating, keyed by external identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: String,
    pub item_id: String,
    pub value: f64,
}

impl Rating {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>, value: f64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            value,
        }
    }
}

/// Closed interval of valid rating values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl RatingScale {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::InvalidRatingScale { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// A recommended item paired with its predicted score.
///
/// The score may be non-finite when the underlying surface left the cell
/// uncomputed; presentation layers are expected to skip those.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: String,
    pub score: f64,
}

/// Accuracy of a prediction surface against held-out ratings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalScores {
    pub rmse: f64,
    pub mae: f64,
}
