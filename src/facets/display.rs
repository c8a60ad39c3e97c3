use serde::{Deserialize, Serialize};

/// A distinct category with its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub value: String,
    pub display_name: String,
}

impl CategoryFacet {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let display_name = display_name(&value);
        Self {
            value,
            display_name,
        }
    }
}

/// `"code_review"` becomes `"Code Review"`.
///
/// Words are separated by underscores or spaces. Empty words (from leading,
/// trailing or repeated separators) are dropped. Only the first character of
/// each word changes case.
pub fn display_name(category: &str) -> String {
    category
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
