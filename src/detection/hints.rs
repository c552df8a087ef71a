//! Automatic version hint detection
//!
//! Build environments usually already know which game version they target.
//! A `VersionHintSource` produces candidate version tags from such an
//! environment; the orchestrator applies a hint to every top-level
//! artifact, but only when the catalog can actually resolve it.

use async_trait::async_trait;
use std::env;

/// Environment variables commonly holding the Minecraft version, plus the
/// Java toolchain version.
pub const WELL_KNOWN_VERSION_VARIABLES: &[&str] = &[
    "MC_VERSION",
    "minecraft_version",
    "mc_version",
    "mcVersion",
    "minecraftVersion",
    "JAVA_VERSION",
];

/// A producer of candidate game version tags
#[async_trait]
pub trait VersionHintSource: Send + Sync {
    /// Source name used in diagnostics.
    fn name(&self) -> &str;

    /// Collect candidate version tags. Candidates are unverified, the
    /// orchestrator discards any the catalog can not resolve.
    async fn collect(&self) -> anyhow::Result<Vec<String>>;
}

/// Hint source reading well-known environment variables
pub struct EnvHintSource {
    variables: Vec<String>,
}

impl Default for EnvHintSource {
    fn default() -> Self {
        Self {
            variables: WELL_KNOWN_VERSION_VARIABLES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl EnvHintSource {
    /// Create a source reading the given variables instead of the
    /// well-known set.
    pub fn new(variables: impl IntoIterator<Item = String>) -> Self {
        Self {
            variables: variables.into_iter().collect(),
        }
    }
}

#[async_trait]
impl VersionHintSource for EnvHintSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn collect(&self) -> anyhow::Result<Vec<String>> {
        let mut hints = Vec::new();

        for variable in &self.variables {
            if let Ok(value) = env::var(variable) {
                let value = value.trim();
                if !value.is_empty() {
                    hints.push(value.to_string());
                }
            }
        }

        Ok(hints)
    }
}
