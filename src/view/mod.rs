//! The boundary a rendering layer talks to.
//!
//! [`CatalogView`] owns the filter state, observes the catalog store and keeps
//! the derived values (facets and the visible list) current. Facets are only
//! recomputed when the committed catalog content changes; the visible list is
//! recomputed after every store commit or filter mutation.

pub mod activation;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::catalog::{CatalogError, CatalogSnapshot, CatalogStore, LoadReport};
use crate::facets::{derive_facets, popular_tags, CategoryFacet, Facets, Stats, TagCount};
use crate::selection::{apply, FilterState, ToolType};
use crate::types::ToolRecord;
pub use activation::{activate, Activation};

/// The filtered records currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibleTools {
    records: Vec<ToolRecord>,
}

impl VisibleTools {
    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ToolRecord> {
        self.records.iter()
    }

    /// Result line shown above the list, or the empty-state message.
    pub fn summary(&self) -> String {
        if self.records.is_empty() {
            "No tools found".to_string()
        } else {
            format!("Found {} tool(s)", self.records.len())
        }
    }
}

pub struct CatalogView {
    store: Arc<CatalogStore>,
    updates: watch::Receiver<Arc<CatalogSnapshot>>,
    filters: FilterState,
    snapshot: Arc<CatalogSnapshot>,
    facets: Arc<Facets>,
    visible: VisibleTools,
}

impl CatalogView {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        let mut updates = store.subscribe();
        let snapshot = updates.borrow_and_update().clone();
        let facets = Arc::new(derive_facets(snapshot.records()));
        let filters = FilterState::default();
        let visible = VisibleTools {
            records: apply(snapshot.records(), &filters),
        };

        Self {
            store,
            updates,
            filters,
            snapshot,
            facets,
            visible,
        }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn snapshot(&self) -> &Arc<CatalogSnapshot> {
        &self.snapshot
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn visible(&self) -> &VisibleTools {
        &self.visible
    }

    pub fn facets(&self) -> &Arc<Facets> {
        &self.facets
    }

    pub fn categories(&self) -> &[CategoryFacet] {
        &self.facets.categories
    }

    pub fn stats(&self) -> &Stats {
        &self.facets.stats
    }

    pub fn popular_tags(&self, limit: usize) -> Vec<TagCount> {
        popular_tags(self.snapshot.records(), limit)
    }

    /// Reload the store, then pick up whatever ended up committed.
    pub async fn reload(&mut self) -> Result<LoadReport, CatalogError> {
        let result = self.store.reload().await;
        self.sync();
        result
    }

    /// Adopt the store's latest commit if there is one. Returns whether the
    /// view changed.
    pub fn sync(&mut self) -> bool {
        if !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        let snapshot = self.updates.borrow_and_update().clone();
        self.adopt(snapshot);
        true
    }

    /// Wait for the next commit and adopt it. Returns false once the store
    /// has gone away.
    pub async fn changed(&mut self) -> bool {
        if self.updates.changed().await.is_err() {
            return false;
        }
        let snapshot = self.updates.borrow_and_update().clone();
        self.adopt(snapshot);
        true
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.set_search_query(query);
        self.refresh_visible();
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        let selected = self.filters.toggle_category(category);
        self.refresh_visible();
        selected
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let selected = self.filters.toggle_tag(tag);
        self.refresh_visible();
        selected
    }

    pub fn set_tool_type(&mut self, tool_type: ToolType) {
        self.filters.set_tool_type(tool_type);
        self.refresh_visible();
    }

    /// Replace the whole filter state at once.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refresh_visible();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refresh_visible();
    }

    /// Decide what activating the record with this id does. `None` if the id
    /// is not in the committed catalog.
    pub fn activate(&self, id: &str) -> Option<Activation> {
        self.snapshot.get(id).map(activate)
    }

    fn adopt(&mut self, snapshot: Arc<CatalogSnapshot>) {
        if snapshot.version() != self.snapshot.version() {
            self.facets = Arc::new(derive_facets(snapshot.records()));
        } else {
            debug!(version = snapshot.version().as_str(), "catalog content unchanged; reusing facets");
        }
        self.snapshot = snapshot;
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible = VisibleTools {
            records: apply(self.snapshot.records(), &self.filters),
        };
    }
}
