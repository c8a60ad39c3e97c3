pub mod identifiers;
pub mod record;

pub use identifiers::{CatalogVersion, ToolId};
pub use record::{RecordError, ToolRecord, DEFAULT_ICON};
