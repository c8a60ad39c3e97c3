use std::collections::BTreeSet;

use crate::selection::state::{FilterState, ToolType};
use crate::types::ToolRecord;

/// One independent predicate of the filter pipeline.
///
/// Stages are combined with AND; multi-select stages are OR internally.
pub trait FilterStage {
    fn name(&self) -> &'static str;

    fn keep(&self, record: &ToolRecord) -> bool;
}

/// Case-insensitive substring match on name, description or any tag.
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    /// `None` for an empty query, which disables the stage.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            None
        } else {
            Some(Self {
                needle: query.to_lowercase(),
            })
        }
    }
}

impl FilterStage for TextFilter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn keep(&self, record: &ToolRecord) -> bool {
        record.name.to_lowercase().contains(&self.needle)
            || record.description.to_lowercase().contains(&self.needle)
            || record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&self.needle))
    }
}

/// Exact, case-sensitive category membership.
pub struct CategoryFilter<'a> {
    selected: &'a BTreeSet<String>,
}

impl<'a> CategoryFilter<'a> {
    pub fn new(selected: &'a BTreeSet<String>) -> Option<Self> {
        (!selected.is_empty()).then_some(Self { selected })
    }
}

impl FilterStage for CategoryFilter<'_> {
    fn name(&self) -> &'static str {
        "category"
    }

    fn keep(&self, record: &ToolRecord) -> bool {
        self.selected.contains(&record.category)
    }
}

/// At least one tag is an exact member of the selection.
pub struct TagFilter<'a> {
    selected: &'a BTreeSet<String>,
}

impl<'a> TagFilter<'a> {
    pub fn new(selected: &'a BTreeSet<String>) -> Option<Self> {
        (!selected.is_empty()).then_some(Self { selected })
    }
}

impl FilterStage for TagFilter<'_> {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn keep(&self, record: &ToolRecord) -> bool {
        record.tags.iter().any(|tag| self.selected.contains(tag))
    }
}

pub struct TypeFilter {
    external: bool,
}

impl TypeFilter {
    pub fn new(tool_type: ToolType) -> Option<Self> {
        match tool_type {
            ToolType::All => None,
            ToolType::External => Some(Self { external: true }),
            ToolType::Internal => Some(Self { external: false }),
        }
    }
}

impl FilterStage for TypeFilter {
    fn name(&self) -> &'static str {
        "type"
    }

    fn keep(&self, record: &ToolRecord) -> bool {
        record.is_external == self.external
    }
}

/// The active stages for a filter state, in evaluation order.
pub fn active_stages(state: &FilterState) -> Vec<Box<dyn FilterStage + '_>> {
    let mut stages: Vec<Box<dyn FilterStage + '_>> = Vec::with_capacity(4);
    if let Some(stage) = TextFilter::new(&state.search_query) {
        stages.push(Box::new(stage));
    }
    if let Some(stage) = CategoryFilter::new(&state.selected_categories) {
        stages.push(Box::new(stage));
    }
    if let Some(stage) = TagFilter::new(&state.selected_tags) {
        stages.push(Box::new(stage));
    }
    if let Some(stage) = TypeFilter::new(state.tool_type) {
        stages.push(Box::new(stage));
    }
    stages
}
