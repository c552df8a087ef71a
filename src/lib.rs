pub mod artifact;
pub mod catalog;
pub mod core;
pub mod detection;
pub mod orchestration;
pub mod security;
pub mod upload;

pub use self::core::*;
pub use artifact::ArtifactNode;
pub use catalog::{GameVersion, VersionCatalog, VersionType, VersionTypeFilter};
pub use detection::{EnvHintSource, VersionHintSource};
pub use orchestration::{PublishOrchestrator, PublishReport, PublishState};
pub use security::SecureTokenManager;
pub use upload::ApiClient;
