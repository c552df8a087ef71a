//! Lenient input coercion for the configuration boundary
//!
//! Publish manifests historically accept numbers, strings, and file
//! references interchangeably for several fields. This module keeps that
//! convenience at the boundary while the core model below it stays strictly
//! typed: one normalization function per field, each failing fast with a
//! descriptive error on unsupported input.

use crate::core::error::PublishError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A loosely typed configuration value as it appears in a manifest.
///
/// In YAML or TOML this deserializes from a plain number, a plain string,
/// or a `{ file = "path" }` table pointing at a file whose contents should
/// be used (changelogs are commonly kept in a separate file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A numeric literal.
    Number(i64),

    /// A string literal.
    Text(String),

    /// A reference to a file whose contents hold the value.
    File { file: PathBuf },
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Normalizes a manifest value into a project ID.
///
/// Numbers pass through, strings are parsed. File references are not a
/// sensible way to express a project ID and are rejected.
pub fn to_project_id(value: &ConfigValue) -> Result<i64, PublishError> {
    match value {
        ConfigValue::Number(id) => Ok(*id),
        ConfigValue::Text(text) => text.trim().parse::<i64>().map_err(|_| {
            PublishError::Configuration {
                message: format!("プロジェクトIDを数値として解釈できません: {text}"),
            }
        }),
        ConfigValue::File { file } => Err(PublishError::Configuration {
            message: format!(
                "ファイル参照はプロジェクトIDとして使用できません: {}",
                file.display()
            ),
        }),
    }
}

/// Normalizes a manifest value into a game version tag.
///
/// Numbers are stringified so versions like `21` can be written without
/// quoting. File references are rejected.
pub fn to_version_tag(value: &ConfigValue) -> Result<String, PublishError> {
    match value {
        ConfigValue::Number(number) => Ok(number.to_string()),
        ConfigValue::Text(text) => Ok(text.clone()),
        ConfigValue::File { file } => Err(PublishError::Configuration {
            message: format!(
                "ファイル参照はバージョンタグとして使用できません: {}",
                file.display()
            ),
        }),
    }
}

/// Normalizes a manifest value into free-form text.
///
/// File references are read as UTF-8, which is how changelogs are usually
/// provided. Numbers are stringified.
pub fn to_text(value: &ConfigValue) -> Result<String, PublishError> {
    match value {
        ConfigValue::Number(number) => Ok(number.to_string()),
        ConfigValue::Text(text) => Ok(text.clone()),
        ConfigValue::File { file } => {
            fs::read_to_string(file).map_err(|e| PublishError::Configuration {
                message: format!("ファイル {} を読み込めません: {e}", file.display()),
            })
        }
    }
}
