pub mod type_filter;
pub mod version_catalog;

pub use type_filter::VersionTypeFilter;
pub use version_catalog::{GameVersion, VersionCatalog, VersionType};
