use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::types::identifiers::ToolId;

/// Icon used when a record does not carry one.
pub const DEFAULT_ICON: &str = "🔧";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Tool ID cannot be empty")]
    EmptyId,
    #[error("Tool name cannot be empty (id: {0})")]
    EmptyName(String),
}

/// A single catalog entry.
///
/// Exactly one of `url` / `guide_content` is expected to be meaningful,
/// matching `is_external`. That agreement is a data-source contract; nothing
/// here enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: ToolId,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_icon", deserialize_with = "icon_or_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "tags_or_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub guide_content: Option<String>,
    #[serde(default = "default_external", deserialize_with = "external_flag")]
    pub is_external: bool,
}

impl ToolRecord {
    /// A record that opens an external URL.
    pub fn external(
        id: impl Into<ToolId>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            url: Some(url.into()),
            icon: default_icon(),
            tags: Vec::new(),
            guide_content: None,
            is_external: true,
        }
    }

    /// A record carrying inline guide content.
    pub fn internal(
        id: impl Into<ToolId>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        guide_content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            url: None,
            icon: default_icon(),
            tags: Vec::new(),
            guide_content: Some(guide_content.into()),
            is_external: false,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Guide content, if present and non-empty.
    pub fn guide(&self) -> Option<&str> {
        self.guide_content.as_deref().filter(|g| !g.is_empty())
    }

    /// Minimal structural checks applied at decode time.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.id.is_empty() {
            return Err(RecordError::EmptyId);
        }
        if self.name.is_empty() {
            return Err(RecordError::EmptyName(self.id.as_str().to_string()));
        }
        Ok(())
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_external() -> bool {
    true
}

// `null` is treated the same as a missing field.
fn tags_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn icon_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_icon))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

// YAML 1.2 reads `yes`/`no` as strings, so accept the usual spellings too.
// `null` keeps the default.
fn external_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(default_external()),
        Some(Flag::Bool(value)) => Ok(value),
        Some(Flag::Text(text)) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "on" => Ok(true),
            "false" | "no" | "n" | "off" => Ok(false),
            _ => Err(serde::de::Error::custom(format!(
                "invalid is_external flag `{text}`"
            ))),
        },
    }
}
