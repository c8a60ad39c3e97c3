use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ToolRecord;

/// Aggregate counts over a whole catalog.
///
/// `external_tools + internal_tools == total_tools`, and the values of
/// `tools_by_category` sum to `total_tools`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_tools: usize,
    pub total_categories: usize,
    pub tools_by_category: BTreeMap<String, usize>,
    pub external_tools: usize,
    pub internal_tools: usize,
}

pub fn compute_stats(records: &[ToolRecord]) -> Stats {
    let mut tools_by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut external_tools = 0;

    for record in records {
        *tools_by_category.entry(record.category.clone()).or_default() += 1;
        if record.is_external {
            external_tools += 1;
        }
    }

    let total_tools = records.len();
    Stats {
        total_tools,
        total_categories: tools_by_category.len(),
        tools_by_category,
        external_tools,
        internal_tools: total_tools - external_tools,
    }
}
