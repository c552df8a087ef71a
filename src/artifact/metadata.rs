//! Upload metadata serialization
//!
//! Builds the JSON `metadata` part of an upload request from a prepared
//! artifact. Field presence follows a hard platform contract: top-level
//! files must send a non-empty `gameVersions` array and no `parentFileID`,
//! children must send `parentFileID` and no `gameVersions` at all. The API
//! also rejects an empty `relations` object, so relations are omitted
//! entirely when none are defined.

use crate::artifact::node::ArtifactNode;
use crate::core::error::PublishError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A relation entry in the upload metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub slug: String,

    #[serde(rename = "type")]
    pub relation_type: String,
}

/// Container for project relations in the upload metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRelations {
    pub projects: Vec<Relation>,
}

/// The `metadata` part of an upload request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,

    #[serde(rename = "changelogType")]
    pub changelog_type: String,

    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "parentFileID", skip_serializing_if = "Option::is_none")]
    pub parent_file_id: Option<i64>,

    #[serde(rename = "gameVersions", skip_serializing_if = "Option::is_none")]
    pub game_versions: Option<BTreeSet<i64>>,

    #[serde(rename = "releaseType")]
    pub release_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<ProjectRelations>,
}

/// Build the upload metadata for a prepared artifact.
///
/// For children `parent_file_id` must carry the parent's uploaded file ID;
/// a child can not be serialized before its parent's upload has completed.
/// For top-level artifacts `parent_file_id` is ignored and the resolved
/// version set from preparation is required to be non-empty.
pub fn build_metadata(
    node: &ArtifactNode,
    parent_file_id: Option<i64>,
) -> Result<Metadata, PublishError> {
    let relations = if node.relations().is_empty() {
        None
    } else {
        Some(ProjectRelations {
            projects: node
                .relations()
                .iter()
                .map(|(slug, relation_type)| Relation {
                    slug: slug.clone(),
                    relation_type: relation_type.clone(),
                })
                .collect(),
        })
    };

    let (game_versions, parent_file_id) = if node.is_child() {
        let parent_id = parent_file_id.ok_or_else(|| PublishError::InvalidOperation {
            message: format!(
                "親ファイルのアップロードが完了する前に子ファイル {} をシリアライズすることはできません",
                node.file_name()
            ),
        })?;

        (None, Some(parent_id))
    } else {
        let resolved = node
            .resolved_version_ids()
            .ok_or_else(|| PublishError::InvalidOperation {
                message: format!("アーティファクト {} の準備が完了していません", node.file_name()),
            })?;

        if resolved.is_empty() {
            return Err(PublishError::Configuration {
                message: format!(
                    "{} には最低1つのゲームバージョンが必要です",
                    node.file_name()
                ),
            });
        }

        (Some(resolved.clone()), None)
    };

    Ok(Metadata {
        changelog: node.changelog.clone(),
        changelog_type: node.changelog_type.clone(),
        display_name: node.display_name.clone(),
        parent_file_id,
        game_versions,
        release_type: node.release_type.clone(),
        relations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::version_catalog::GameVersion;
    use crate::catalog::{VersionCatalog, VersionType, VersionTypeFilter};
    use crate::core::constants::RELATION_REQUIRED;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn prepared_parent() -> (NamedTempFile, ArtifactNode) {
        let mut catalog = VersionCatalog::new(VersionTypeFilter::default());
        catalog.rebuild(
            vec![VersionType {
                id: 1,
                name: "Minecraft 1.20".to_string(),
                slug: "minecraft-1-20".to_string(),
            }],
            vec![GameVersion {
                id: 100,
                game_version_type_id: 1,
                slug: "1-20-1".to_string(),
                name: "1.20.1".to_string(),
            }],
        );

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "jar bytes").unwrap();
        let mut node = ArtifactNode::new(123456, file.path());
        node.add_game_version(["1.20.1"]).unwrap();
        node.prepare(&catalog).unwrap();

        (file, node)
    }

    #[test]
    fn test_top_level_metadata_has_versions_and_no_parent() {
        let (_file, node) = prepared_parent();

        let metadata = build_metadata(&node, None).unwrap();
        assert_eq!(metadata.game_versions, Some([100].into_iter().collect()));
        assert!(metadata.parent_file_id.is_none());

        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json.get("gameVersions").is_some());
        assert!(json.get("parentFileID").is_none());
    }

    #[test]
    fn test_child_metadata_has_parent_and_no_versions() {
        let (_file, mut node) = prepared_parent();
        node.with_additional_file("mod-sources.jar").unwrap();

        let metadata = build_metadata(&node.children()[0], Some(555)).unwrap();
        assert_eq!(metadata.parent_file_id, Some(555));
        assert!(metadata.game_versions.is_none());

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["parentFileID"], 555);
        assert!(json.get("gameVersions").is_none());
    }

    #[test]
    fn test_child_without_uploaded_parent_fails() {
        let (_file, mut node) = prepared_parent();
        node.with_additional_file("mod-sources.jar").unwrap();

        let result = build_metadata(&node.children()[0], None);
        assert!(matches!(
            result,
            Err(PublishError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_unprepared_top_level_fails() {
        let node = ArtifactNode::new(123456, "mod.jar");
        let result = build_metadata(&node, None);
        assert!(matches!(
            result,
            Err(PublishError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_empty_version_set_fails() {
        let mut catalog = VersionCatalog::new(VersionTypeFilter::default());
        catalog.rebuild(vec![], vec![]);

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "jar bytes").unwrap();
        let mut node = ArtifactNode::new(123456, file.path());
        node.prepare(&catalog).unwrap();

        let result = build_metadata(&node, None);
        assert!(matches!(
            result,
            Err(PublishError::Configuration { .. })
        ));
    }

    #[test]
    fn test_relations_omitted_when_empty() {
        let (_file, node) = prepared_parent();

        let metadata = build_metadata(&node, None).unwrap();
        assert!(metadata.relations.is_none());

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(!json.contains("relations"));
    }

    #[test]
    fn test_relations_serialized_when_present() {
        let (_file, mut node) = prepared_parent();
        node.add_relation("some-library", RELATION_REQUIRED);

        let metadata = build_metadata(&node, None).unwrap();
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["relations"]["projects"][0]["slug"], "some-library");
        assert_eq!(json["relations"]["projects"][0]["type"], RELATION_REQUIRED);
    }

    #[test]
    fn test_wire_field_names() {
        let (_file, mut node) = prepared_parent();
        node.changelog = Some("Fixed things".to_string());
        node.display_name = Some("My Mod 1.0.0".to_string());

        let json = serde_json::to_value(build_metadata(&node, None).unwrap()).unwrap();

        assert_eq!(json["changelog"], "Fixed things");
        assert_eq!(json["changelogType"], "text");
        assert_eq!(json["displayName"], "My Mod 1.0.0");
        assert_eq!(json["releaseType"], "alpha");
    }

    #[test]
    fn test_optional_fields_omitted_when_unset() {
        let (_file, node) = prepared_parent();
        let json = serde_json::to_value(build_metadata(&node, None).unwrap()).unwrap();

        assert!(json.get("changelog").is_none());
        assert!(json.get("displayName").is_none());
    }
}
