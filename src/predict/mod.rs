pub mod factorization;
pub mod neighborhood;

/// Selects whether neighborhood prediction compares rows (users) or
/// columns (items) of the rating matrix. Item-based prediction is
/// equivalent to transposing the matrix first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    UserBased,
    ItemBased,
}

impl Orientation {
    pub(crate) fn entity_axis(self) -> &'static str {
        match self {
            Orientation::UserBased => "user",
            Orientation::ItemBased => "item",
        }
    }

    pub(crate) fn counterpart_axis(self) -> &'static str {
        match self {
            Orientation::UserBased => "item",
            Orientation::ItemBased => "user",
        }
    }
}
