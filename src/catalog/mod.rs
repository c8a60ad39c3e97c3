pub mod parse;
pub mod snapshot;
pub mod source;
pub mod store;

use thiserror::Error;

pub use parse::{decode_catalog, DecodedCatalog};
pub use snapshot::CatalogSnapshot;
pub use source::{
    CatalogFormat, CatalogSource, FileSource, HttpSource, RawCatalog, SourceError, StaticSource,
};
pub use store::{CatalogStore, LoadReport};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}
