use std::collections::HashMap;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::models::Rating;

/// Sentinel for "no rating recorded" in the dense training representation.
///
/// Ground-truth and prediction surfaces use [`NOT_COMPUTED`] (`NaN`) instead;
/// the two encodings are deliberately kept on separate types so they cannot
/// be mixed up.
pub const UNRATED: f64 = 0.0;

/// Sentinel for "missing" / "not computed" cells in a [`Surface`].
pub const NOT_COMPUTED: f64 = f64::NAN;

/// Bijection between opaque external identifiers and dense indices.
///
/// Built once at ingest, insertion-ordered, immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    ids: Vec<String>,
    indices: HashMap<String, usize>,
}

impl IdIndex {
    /// Builds an index from a list of ids, rejecting duplicates.
    pub fn from_ids(axis: &'static str, ids: Vec<String>) -> Result<Self> {
        let mut index = Self::default();
        for id in ids {
            if index.indices.contains_key(&id) {
                return Err(Error::DuplicateId { axis, id });
            }
            index.get_or_insert(&id);
        }
        Ok(index)
    }

    fn get_or_insert(&mut self, id: &str) -> usize {
        if let Some(&index) = self.indices.get(id) {
            return index;
        }
        let index = self.ids.len();
        self.ids.push(id.to_string());
        self.indices.insert(id.to_string(), index);
        index
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.indices.get(id).copied()
    }

    pub fn id_of(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Dense in-memory view of a sparse user-item rating matrix.
///
/// Cells hold either a rating or [`UNRATED`]. Immutable for the duration of
/// a prediction run; predictors only ever read it.
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    values: Array2<f64>,
    users: IdIndex,
    items: IdIndex,
}

impl RatingMatrix {
    /// Builds the matrix from a list of observed ratings.
    ///
    /// Index assignment follows first occurrence of each external id; on
    /// duplicate `(user, item)` pairs the last occurrence wins. Rating
    /// values must be finite and positive (zero would alias the sentinel).
    pub fn from_ratings(ratings: &[Rating]) -> Result<Self> {
        if ratings.is_empty() {
            return Err(Error::EmptyRatings);
        }

        let mut users = IdIndex::default();
        let mut items = IdIndex::default();
        let mut cells = Vec::with_capacity(ratings.len());

        for rating in ratings {
            if !rating.value.is_finite() || rating.value <= 0.0 {
                return Err(Error::InvalidRating {
                    user_id: rating.user_id.clone(),
                    item_id: rating.item_id.clone(),
                    value: rating.value,
                });
            }
            let user = users.get_or_insert(&rating.user_id);
            let item = items.get_or_insert(&rating.item_id);
            cells.push((user, item, rating.value));
        }

        let mut values = Array2::from_elem((users.len(), items.len()), UNRATED);
        for (user, item, value) in cells {
            values[[user, item]] = value;
        }

        Ok(Self {
            values,
            users,
            items,
        })
    }

    /// Wraps an already-dense matrix produced by an external loading step.
    ///
    /// Row and column counts must match the id lists, and every cell must be
    /// either [`UNRATED`] or a finite positive rating.
    pub fn from_dense(
        values: Array2<f64>,
        user_ids: Vec<String>,
        item_ids: Vec<String>,
    ) -> Result<Self> {
        let users = IdIndex::from_ids("user", user_ids)?;
        let items = IdIndex::from_ids("item", item_ids)?;
        let expected = (users.len(), items.len());
        let actual = (values.nrows(), values.ncols());
        if expected != actual {
            return Err(Error::ShapeMismatch { expected, actual });
        }
        for ((user, item), &value) in values.indexed_iter() {
            if value == UNRATED {
                continue;
            }
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidRating {
                    user_id: users.id_of(user).unwrap_or_default().to_string(),
                    item_id: items.id_of(item).unwrap_or_default().to_string(),
                    value,
                });
            }
        }
        Ok(Self {
            values,
            users,
            items,
        })
    }

    pub fn n_users(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_items(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn users(&self) -> &IdIndex {
        &self.users
    }

    pub fn items(&self) -> &IdIndex {
        &self.items
    }

    pub fn rating(&self, user: usize, item: usize) -> Result<f64> {
        check_index("user", user, self.n_users())?;
        check_index("item", item, self.n_items())?;
        Ok(self.values[[user, item]])
    }

    pub fn is_rated(&self, user: usize, item: usize) -> bool {
        self.values
            .get([user, item])
            .map(|&v| v != UNRATED)
            .unwrap_or(false)
    }

    /// Mean of the user's rated items, or `0.0` for a user with no ratings.
    pub fn user_mean(&self, user: usize) -> Result<f64> {
        check_index("user", user, self.n_users())?;
        let row = self.values.row(user);
        let rated: Vec<f64> = row.iter().copied().filter(|&v| v != UNRATED).collect();
        if rated.is_empty() {
            Ok(0.0)
        } else {
            Ok(rated.iter().sum::<f64>() / rated.len() as f64)
        }
    }

    /// Builds a held-out ground-truth surface in this matrix's index space.
    ///
    /// Unobserved cells are [`NOT_COMPUTED`]; external ids unknown to this
    /// matrix are rejected rather than silently dropped.
    pub fn ground_truth(&self, ratings: &[Rating]) -> Result<Surface> {
        let mut surface = Surface::not_computed(self.n_users(), self.n_items());
        for rating in ratings {
            let user = self
                .users
                .index_of(&rating.user_id)
                .ok_or_else(|| Error::UnknownId {
                    axis: "user",
                    id: rating.user_id.clone(),
                })?;
            let item = self
                .items
                .index_of(&rating.item_id)
                .ok_or_else(|| Error::UnknownId {
                    axis: "item",
                    id: rating.item_id.clone(),
                })?;
            surface.set(user, item, rating.value)?;
        }
        Ok(surface)
    }
}

/// Dense matrix of predicted (or held-out) ratings.
///
/// Uses the `NaN` missing-marker convention, never the zero sentinel of
/// [`RatingMatrix`].
#[derive(Debug, Clone)]
pub struct Surface {
    values: Array2<f64>,
}

impl Surface {
    pub fn not_computed(rows: usize, cols: usize) -> Self {
        Self {
            values: Array2::from_elem((rows, cols), NOT_COMPUTED),
        }
    }

    pub fn from_values(values: Array2<f64>) -> Self {
        Self { values }
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.values.nrows(), self.values.ncols())
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        check_index("row", row, self.nrows())?;
        check_index("column", col, self.ncols())?;
        Ok(self.values[[row, col]])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        check_index("row", row, self.nrows())?;
        check_index("column", col, self.ncols())?;
        self.values[[row, col]] = value;
        Ok(())
    }

    pub fn is_computed(&self, row: usize, col: usize) -> bool {
        self.values
            .get([row, col])
            .map(|v| !v.is_nan())
            .unwrap_or(false)
    }
}

pub(crate) fn check_index(axis: &'static str, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(Error::IndexOutOfBounds { axis, index, len });
    }
    Ok(())
}
