//! Game version catalog
//!
//! The numeric version IDs required by the upload API are not guaranteed to
//! be stable between uploads, so they are fetched fresh at the start of
//! every publish run. The catalog indexes the fetched versions by name and
//! by slug and resolves the human-readable tags configured on artifacts
//! into their numeric IDs.

use crate::catalog::type_filter::VersionTypeFilter;
use crate::core::error::PublishError;
use crate::upload::client::ApiClient;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// A version type (category) fetched from the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionType {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A game version fetched from the API
///
/// Identity is defined by `id` alone. Names and slugs are display values
/// and may collide between entries.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    pub id: i64,

    #[serde(rename = "gameVersionTypeID")]
    pub game_version_type_id: i64,

    pub slug: String,

    pub name: String,
}

impl PartialEq for GameVersion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for GameVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Catalog of valid game versions for a publish run
///
/// The catalog is rebuilt from scratch on every `refresh` and is treated as
/// read-only for the remainder of the run.
pub struct VersionCatalog {
    filter: VersionTypeFilter,
    valid_types: HashSet<i64>,
    by_name: HashMap<String, GameVersion>,
    by_slug: HashMap<String, GameVersion>,
}

impl VersionCatalog {
    /// Create an empty catalog with the given type filter.
    pub fn new(filter: VersionTypeFilter) -> Self {
        Self {
            filter,
            valid_types: HashSet::new(),
            by_name: HashMap::new(),
            by_slug: HashMap::new(),
        }
    }

    /// Discard the current data and rebuild it from the API.
    ///
    /// Performs two sequential fetches, version types first. Returns the
    /// collision warnings produced while indexing. Any transport failure is
    /// fatal for the whole publish run.
    pub async fn refresh(
        &mut self,
        client: &ApiClient,
        token: &SecretString,
    ) -> Result<Vec<String>, PublishError> {
        let types = client.fetch_version_types(token).await?;
        let versions = client.fetch_versions(token).await?;
        Ok(self.rebuild(types, versions))
    }

    /// Rebuild the indexes from fetched data.
    ///
    /// Name and slug collisions keep the later entry and produce a warning,
    /// matching the behavior the platform has always had. A stricter fail
    /// on collision policy is a candidate for the future.
    pub(crate) fn rebuild(
        &mut self,
        types: Vec<VersionType>,
        versions: Vec<GameVersion>,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        self.valid_types.clear();
        self.by_name.clear();
        self.by_slug.clear();

        for version_type in &types {
            if self.filter.matches(version_type) {
                self.valid_types.insert(version_type.id);
            }
        }

        for version in versions {
            if !self.valid_types.contains(&version.game_version_type_id) {
                continue;
            }

            if let Some(existing) = self.by_name.get(&version.name) {
                warnings.push(format!(
                    "バージョン名 {} は既に登録されています。旧ID {} を新ID {} で上書きします",
                    version.name, existing.id, version.id
                ));
            }
            self.by_name.insert(version.name.clone(), version.clone());

            if let Some(existing) = self.by_slug.get(&version.slug) {
                warnings.push(format!(
                    "バージョンスラッグ {} は既に登録されています。旧ID {} を新ID {} で上書きします",
                    version.slug, existing.id, version.id
                ));
            }
            self.by_slug.insert(version.slug.clone(), version);
        }

        warnings
    }

    /// Look up a version by name or slug. The name takes priority and the
    /// match is case sensitive.
    pub fn lookup(&self, tag: &str) -> Option<&GameVersion> {
        self.by_name.get(tag).or_else(|| self.by_slug.get(tag))
    }

    /// Resolve a set of tags into numeric version IDs.
    ///
    /// All-or-nothing: the first tag without a match fails the whole call
    /// and no partial result is returned.
    pub fn resolve(&self, tags: &BTreeSet<String>) -> Result<BTreeSet<i64>, PublishError> {
        let mut resolved = BTreeSet::new();

        for tag in tags {
            match self.lookup(tag) {
                Some(version) => {
                    resolved.insert(version.id);
                }
                None => {
                    return Err(PublishError::UnresolvedVersion { tag: tag.clone() });
                }
            }
        }

        Ok(resolved)
    }

    /// Number of versions currently indexed by name.
    pub fn version_count(&self) -> usize {
        self.by_name.len()
    }
}
