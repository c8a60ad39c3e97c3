//! Deterministic filtering and facet engine for tool catalogs.
//!
//! `toolhub-core` loads a catalog of tool records from a file, an HTTP
//! endpoint or memory, derives category facets and statistics from it, and
//! computes the filtered view for a given filter state. Filtering and facet
//! derivation are pure: identical inputs always produce identical outputs.
//!
//! Loading is the only asynchronous operation. The store publishes whole
//! snapshots; readers never observe a partially loaded catalog.

pub mod catalog;
pub mod config;
pub mod facets;
pub mod guide;
pub mod selection;
pub mod types;
pub mod view;
