pub mod catalog;
pub mod results;
pub mod types;

pub use catalog::{CatalogError, Catalogs, SourceCatalog, SourceEntry, SourceKind};
pub use results::{Metric, ResultSet, Summary};
pub use types::*;
