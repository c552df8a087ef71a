//! Publish manifest loader
//!
//! Loads `PublishManifest` files in YAML, TOML, or JSON format, picking the
//! parser from the file extension. A `discover` helper finds a manifest in
//! a project directory using a fixed candidate list.

use crate::core::config::PublishManifest;
use crate::core::error::PublishError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manifest file names probed by `discover`, in priority order.
const MANIFEST_CANDIDATES: &[&str] = &[
    "curseforge-publish.yaml",
    "curseforge-publish.yml",
    "curseforge-publish.toml",
    "curseforge-publish.json",
];

/// Publish manifest loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a manifest from an explicit path.
    pub async fn load(path: &Path) -> Result<PublishManifest, PublishError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PublishError::Configuration {
                message: format!("マニフェスト {} を読み込めません: {e}", path.display()),
            })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension {
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| PublishError::Configuration {
                    message: format!("YAMLマニフェストの解析に失敗しました: {e}"),
                })
            }
            "toml" => toml::from_str(&content).map_err(|e| PublishError::Configuration {
                message: format!("TOMLマニフェストの解析に失敗しました: {e}"),
            }),
            "json" => {
                serde_json::from_str(&content).map_err(|e| PublishError::Configuration {
                    message: format!("JSONマニフェストの解析に失敗しました: {e}"),
                })
            }
            other => Err(PublishError::Configuration {
                message: format!("サポートされていないマニフェスト形式です: .{other}"),
            }),
        }
    }

    /// Find a manifest in the given directory.
    ///
    /// Returns `None` when no candidate file exists.
    pub async fn discover(project_path: &Path) -> Option<PathBuf> {
        for candidate in MANIFEST_CANDIDATES {
            let path = project_path.join(candidate);
            if fs::metadata(&path).await.is_ok() {
                return Some(path);
            }
        }

        None
    }
}
