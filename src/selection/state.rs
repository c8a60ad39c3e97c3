use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which kind of record the type toggle lets through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    All,
    External,
    Internal,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown tool type `{0}` (expected all, external or internal)")]
pub struct ParseToolTypeError(String);

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::All => "all",
            ToolType::External => "external",
            ToolType::Internal => "internal",
        }
    }
}

impl FromStr for ToolType {
    type Err = ParseToolTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ToolType::All),
            "external" => Ok(ToolType::External),
            "internal" => Ok(ToolType::Internal),
            _ => Err(ParseToolTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's current query.
///
/// Empty selections mean "no restriction". Nothing is validated: selected
/// categories or tags that no record carries simply match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_query: String,
    pub selected_categories: BTreeSet<String>,
    pub selected_tags: BTreeSet<String>,
    pub tool_type: ToolType,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tool_type(mut self, tool_type: ToolType) -> Self {
        self.tool_type = tool_type;
        self
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_tool_type(&mut self, tool_type: ToolType) {
        self.tool_type = tool_type;
    }

    /// Adds the category if absent, removes it otherwise. Returns whether it
    /// is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle(&mut self.selected_categories, category)
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        toggle(&mut self.selected_tags, tag)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no stage would filter anything.
    pub fn is_empty(&self) -> bool {
        self.search_query.is_empty()
            && self.selected_categories.is_empty()
            && self.selected_tags.is_empty()
            && self.tool_type == ToolType::All
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}
