//! Runtime configuration and publish manifest types
//!
//! `PublishConfig` is the strictly typed runtime configuration consumed by
//! the orchestrator. `PublishManifest` is the serde representation of a
//! publish manifest file (YAML or TOML) and leans on the lenient coercion
//! boundary for fields that accept multiple shapes.

use crate::core::coerce::ConfigValue;
use crate::core::constants::DEFAULT_API_ENDPOINT;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Runtime configuration for a publish run
#[derive(Clone)]
pub struct PublishConfig {
    /// The game specific API endpoint.
    pub api_endpoint: String,

    /// The API token used to publish files. Required before any network
    /// call is made.
    pub api_token: Option<SecretString>,

    /// Whether version hints from the environment should be applied to all
    /// top-level artifacts before preparation.
    pub version_detection: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_token: None,
            version_detection: true,
        }
    }
}

impl PublishConfig {
    /// Create a configuration with the default endpoint and the given token.
    pub fn with_token(token: SecretString) -> Self {
        Self {
            api_token: Some(token),
            ..Self::default()
        }
    }
}

/// A single publish manifest, usually loaded from a file
///
/// One manifest describes one top-level artifact and its additional files.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishManifest {
    /// Override for the game API endpoint.
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// The CurseForge project to upload to. Accepts a number or a string.
    pub project_id: ConfigValue,

    /// Path to the file to upload.
    pub file: PathBuf,

    /// Optional display name shown instead of the file name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Changelog text, or a `{ file = "..." }` reference.
    #[serde(default)]
    pub changelog: Option<ConfigValue>,

    /// Changelog format, defaults to plain text.
    #[serde(default)]
    pub changelog_type: Option<String>,

    /// Release tier, defaults to alpha.
    #[serde(default)]
    pub release_type: Option<String>,

    /// Game version tags. Accepts numbers and strings.
    #[serde(default)]
    pub game_versions: Vec<ConfigValue>,

    /// Project relations, slug to relation type.
    #[serde(default)]
    pub relations: BTreeMap<String, String>,

    /// Additional files uploaded as children of the main file.
    #[serde(default)]
    pub additional_files: Vec<AdditionalFileManifest>,

    /// Whether environment version detection is enabled for this run.
    #[serde(default)]
    pub version_detection: Option<bool>,
}

/// Manifest entry for an additional (child) file
#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalFileManifest {
    /// Path to the file to upload.
    pub file: PathBuf,

    /// Optional display name shown instead of the file name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Changelog override. Children inherit the parent changelog otherwise.
    #[serde(default)]
    pub changelog: Option<ConfigValue>,

    /// Changelog format override.
    #[serde(default)]
    pub changelog_type: Option<String>,

    /// Release tier override.
    #[serde(default)]
    pub release_type: Option<String>,

    /// Relation overrides applied on top of the inherited relation map.
    #[serde(default)]
    pub relations: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PublishConfig::default();

        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!(config.api_token.is_none());
        assert!(config.version_detection);
    }

    #[test]
    fn test_with_token() {
        let config = PublishConfig::with_token(SecretString::new("cf-token".into()));
        assert!(config.api_token.is_some());
    }

    #[test]
    fn test_manifest_minimal_yaml() {
        let manifest: PublishManifest = serde_yaml::from_str(
            r#"
project_id: 123456
file: build/libs/mod-1.0.0.jar
"#,
        )
        .unwrap();

        assert_eq!(manifest.project_id, ConfigValue::Number(123456));
        assert_eq!(manifest.file, PathBuf::from("build/libs/mod-1.0.0.jar"));
        assert!(manifest.game_versions.is_empty());
        assert!(manifest.additional_files.is_empty());
    }

    #[test]
    fn test_manifest_full_yaml() {
        let manifest: PublishManifest = serde_yaml::from_str(
            r#"
project_id: "123456"
file: build/libs/mod-1.0.0.jar
display_name: My Mod 1.0.0
changelog:
  file: CHANGELOG.md
changelog_type: markdown
release_type: beta
game_versions:
  - 1.20.1
  - Forge
relations:
  some-library: requiredDependency
additional_files:
  - file: build/libs/mod-1.0.0-sources.jar
    release_type: release
"#,
        )
        .unwrap();

        assert_eq!(manifest.changelog_type.as_deref(), Some("markdown"));
        assert_eq!(manifest.game_versions.len(), 2);
        assert_eq!(
            manifest.relations.get("some-library").map(String::as_str),
            Some("requiredDependency")
        );
        assert_eq!(manifest.additional_files.len(), 1);
        assert_eq!(
            manifest.additional_files[0].release_type.as_deref(),
            Some("release")
        );
    }
}
