use serde::{Deserialize, Serialize};

use crate::economy::catalog::{Catalog, ItemId, TransformId};
use crate::economy::state::EconomyState;

/// Termination predicate for a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    /// Rank ordinal at or above.
    Rank(usize),
    /// Fusion ordinal at or above.
    Fusion(usize),
    Transformation(TransformId),
    /// Item at or above a grade.
    ItemGrade(ItemId, usize),
}

impl Milestone {
    pub fn reached(&self, state: &EconomyState, catalog: &Catalog) -> bool {
        match *self {
            Milestone::Rank(r) => state.rank >= r,
            Milestone::Fusion(f) => state.fusion >= f,
            Milestone::Transformation(id) => state.transformations.contains(&id),
            Milestone::ItemGrade(id, grade) => state.item_grade(catalog, id) >= grade,
        }
    }

    pub fn describe(&self, catalog: &Catalog) -> String {
        match *self {
            Milestone::Rank(r) => format!("rank {}", catalog.rank_name(r)),
            Milestone::Fusion(f) => format!("fusion {}", catalog.fusion_name(f)),
            Milestone::Transformation(id) => {
                format!("{} transformation", catalog.transformation_name(id))
            }
            Milestone::ItemGrade(id, grade) => format!(
                "{} grade {}",
                catalog.item(id).map_or("?", |it| it.name.as_str()),
                grade
            ),
        }
    }
}
