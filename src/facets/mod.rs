pub mod display;
pub mod stats;
pub mod tags;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::ToolRecord;
pub use display::{display_name, CategoryFacet};
pub use stats::{compute_stats, Stats};
pub use tags::{popular_tags, TagCount};

/// Everything derived from a catalog independent of the current filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub categories: Vec<CategoryFacet>,
    pub stats: Stats,
}

/// Distinct categories, alphabetical by raw value.
pub fn category_facets(records: &[ToolRecord]) -> Vec<CategoryFacet> {
    records
        .iter()
        .map(|r| r.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(CategoryFacet::new)
        .collect()
}

pub fn derive_facets(records: &[ToolRecord]) -> Facets {
    Facets {
        categories: category_facets(records),
        stats: compute_stats(records),
    }
}
