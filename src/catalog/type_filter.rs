//! Version type filtering
//!
//! The version list returned by the API mixes categories from every corner
//! of the platform. Only versions whose type passes this filter are indexed
//! by the catalog. The default allow-list targets Minecraft, which also
//! files Java versions, mod loaders, and the client/server environment
//! under its own version types.

use crate::catalog::version_catalog::VersionType;

/// Allow-list filter for version types
///
/// A type is accepted when its slug starts with one of the configured
/// prefixes or matches one of the exact slugs.
#[derive(Debug, Clone)]
pub struct VersionTypeFilter {
    prefixes: Vec<String>,
    slugs: Vec<String>,
}

impl Default for VersionTypeFilter {
    fn default() -> Self {
        Self {
            prefixes: vec!["minecraft".to_string()],
            slugs: vec![
                "java".to_string(),
                "modloader".to_string(),
                "environment".to_string(),
            ],
        }
    }
}

impl VersionTypeFilter {
    /// Create a filter from explicit prefix and exact-slug allow-lists.
    pub fn new(
        prefixes: impl IntoIterator<Item = String>,
        slugs: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            prefixes: prefixes.into_iter().collect(),
            slugs: slugs.into_iter().collect(),
        }
    }

    /// Check whether a fetched version type passes the filter.
    pub fn matches(&self, version_type: &VersionType) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| version_type.slug.starts_with(prefix.as_str()))
            || self.slugs.iter().any(|slug| version_type.slug == *slug)
    }
}
