use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ToolRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Most used tags, compared case-insensitively.
///
/// Ordered by count descending, then tag ascending. Every occurrence counts,
/// including repeats within one record.
pub fn popular_tags(records: &[ToolRecord], limit: usize) -> Vec<TagCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for tag in records.iter().flat_map(|r| r.tags.iter()) {
        *counts.entry(tag.to_lowercase()).or_default() += 1;
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();

    // BTreeMap iteration is already tag-ascending; a stable sort keeps it for ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}
