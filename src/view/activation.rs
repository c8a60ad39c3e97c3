use serde::Serialize;

use crate::guide::render_guide;
use crate::types::ToolRecord;

/// What the host should do when a record is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Activation {
    /// Show the in-app guide. `html` is the rendered guide content.
    OpenGuide { title: String, icon: String, html: String },
    /// Hand the URL to the host's external navigation.
    OpenUrl { url: String },
    Noop,
}

/// Guide content wins over a URL; a record with neither does nothing.
pub fn activate(record: &ToolRecord) -> Activation {
    if let Some(guide) = record.guide() {
        return Activation::OpenGuide {
            title: record.name.clone(),
            icon: record.icon.clone(),
            html: render_guide(guide),
        };
    }

    match record.url.as_deref() {
        Some(url) if !url.is_empty() => Activation::OpenUrl {
            url: url.to_string(),
        },
        _ => Activation::Noop,
    }
}
