// A committed snapshot is never mutated. Reloads publish a new one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::types::{CatalogVersion, ToolId, ToolRecord};

#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    generation: u64,
    version: CatalogVersion,
    source: String,
    loaded_at: Option<DateTime<Utc>>, // informational only
    failure: Option<String>,
    records: Vec<ToolRecord>,
    by_id: BTreeMap<ToolId, usize>,
}

impl CatalogSnapshot {
    /// The state of a store that has not loaded anything yet.
    pub fn unloaded(source: impl Into<String>) -> Self {
        Self {
            generation: 0,
            version: CatalogVersion::from_content(&[]),
            source: source.into(),
            loaded_at: None,
            failure: None,
            records: Vec::new(),
            by_id: BTreeMap::new(),
        }
    }

    /// The empty state committed after a failed load.
    pub fn failed(generation: u64, source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            generation,
            version: CatalogVersion::from_content(&[]),
            source: source.into(),
            loaded_at: Some(Utc::now()),
            failure: Some(reason.into()),
            records: Vec::new(),
            by_id: BTreeMap::new(),
        }
    }

    pub fn new(
        generation: u64,
        version: CatalogVersion,
        source: impl Into<String>,
        records: Vec<ToolRecord>,
    ) -> Self {
        let mut by_id = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            if by_id.contains_key(&record.id) {
                warn!(id = %record.id, "duplicate tool id; lookups resolve to the first occurrence");
                continue;
            }
            by_id.insert(record.id.clone(), index);
        }

        Self {
            generation,
            version,
            source: source.into(),
            loaded_at: Some(Utc::now()),
            failure: None,
            records,
            by_id,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn version(&self) -> &CatalogVersion {
        &self.version
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Why the load that produced this snapshot failed, if it did.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ToolRecord> {
        self.by_id
            .get(&ToolId::from(id))
            .and_then(|&index| self.records.get(index))
    }

    /// Records of one category, in catalog order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ToolRecord> + 'a {
        self.records.iter().filter(move |r| r.category == category)
    }
}
