//! Artifact data model
//!
//! An `ArtifactNode` is one publishable file. Top-level nodes own their
//! additional files (children) directly; a child never holds a reference
//! back to its parent. The parent's uploaded file ID is instead passed
//! explicitly when the child is serialized, see the metadata module.
//!
//! Validation never mutates global state: mutators and `prepare` return the
//! warnings they produce and leave surfacing them to the caller.

use crate::catalog::VersionCatalog;
use crate::core::constants::{
    CHANGELOG_TEXT, RELATION_EMBEDDED, RELATION_INCOMPATIBLE, RELATION_OPTIONAL,
    RELATION_REQUIRED, RELATION_TOOL, RELEASE_TYPE_ALPHA, is_known_changelog_type,
    is_known_relation_type, is_known_release_type,
};
use crate::core::error::PublishError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// One publishable file and its additional files
#[derive(Debug, Clone)]
pub struct ArtifactNode {
    project_id: i64,
    source: PathBuf,
    is_child: bool,

    /// Optional changelog shown on the file page.
    pub changelog: Option<String>,

    /// Changelog format, defaults to plain text.
    pub changelog_type: String,

    /// Optional display name. When set it hides the file name.
    pub display_name: Option<String>,

    /// Release tier, defaults to alpha. Automated builds are recommended
    /// to keep the alpha tier.
    pub release_type: String,

    game_versions: BTreeSet<String>,
    relations: BTreeMap<String, String>,
    children: Vec<ArtifactNode>,
    resolved_version_ids: Option<BTreeSet<i64>>,
    remote_file_id: Option<i64>,
}

impl ArtifactNode {
    /// Create a new top-level artifact.
    pub fn new(project_id: i64, source: impl Into<PathBuf>) -> Self {
        Self {
            project_id,
            source: source.into(),
            is_child: false,
            changelog: None,
            changelog_type: CHANGELOG_TEXT.to_string(),
            display_name: None,
            release_type: RELEASE_TYPE_ALPHA.to_string(),
            game_versions: BTreeSet::new(),
            relations: BTreeMap::new(),
            children: Vec::new(),
            resolved_version_ids: None,
            remote_file_id: None,
        }
    }

    /// The CurseForge project this artifact belongs to. Children always
    /// share the project of their parent.
    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    /// Path of the file to upload.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name used in diagnostics and reports.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// Whether this node is an additional file of another artifact.
    pub fn is_child(&self) -> bool {
        self.is_child
    }

    /// The game version tags requested for this artifact.
    pub fn game_versions(&self) -> &BTreeSet<String> {
        &self.game_versions
    }

    /// The relation map, project slug to relation type.
    pub fn relations(&self) -> &BTreeMap<String, String> {
        &self.relations
    }

    /// The additional files of this artifact, in declaration order.
    pub fn children(&self) -> &[ArtifactNode] {
        &self.children
    }

    pub(crate) fn child_mut(&mut self, index: usize) -> &mut ArtifactNode {
        &mut self.children[index]
    }

    /// Version IDs resolved during preparation. `None` until `prepare` has
    /// run, and always `None` on children.
    pub fn resolved_version_ids(&self) -> Option<&BTreeSet<i64>> {
        self.resolved_version_ids.as_ref()
    }

    /// The file ID assigned by the platform after a successful upload.
    pub fn remote_file_id(&self) -> Option<i64> {
        self.remote_file_id
    }

    pub(crate) fn set_remote_file_id(&mut self, file_id: i64) {
        self.remote_file_id = Some(file_id);
    }

    /// Create an additional file uploaded as a child of this artifact.
    ///
    /// Children copy the changelog, changelog type, release type, and the
    /// relation map at creation time; each copy can be changed
    /// independently afterwards. Game versions are always inherited from
    /// the parent by the platform and can not be set on the child.
    ///
    /// Artifacts can only be nested one layer deep, calling this on a
    /// child fails with `InvalidNesting`.
    pub fn with_additional_file(
        &mut self,
        source: impl Into<PathBuf>,
    ) -> Result<&mut ArtifactNode, PublishError> {
        if self.is_child {
            return Err(PublishError::InvalidNesting);
        }

        let child = ArtifactNode {
            project_id: self.project_id,
            source: source.into(),
            is_child: true,
            changelog: self.changelog.clone(),
            changelog_type: self.changelog_type.clone(),
            display_name: None,
            release_type: self.release_type.clone(),
            game_versions: BTreeSet::new(),
            relations: self.relations.clone(),
            children: Vec::new(),
            resolved_version_ids: None,
            remote_file_id: None,
        };

        self.children.push(child);
        let index = self.children.len() - 1;
        Ok(&mut self.children[index])
    }

    /// Add game version tags to this artifact.
    ///
    /// Children inherit the versions of their parent, attempting to set
    /// versions on a child fails with `InvalidOperation`.
    pub fn add_game_version<S: AsRef<str>>(
        &mut self,
        tags: impl IntoIterator<Item = S>,
    ) -> Result<(), PublishError> {
        if self.is_child {
            return Err(PublishError::InvalidOperation {
                message: "子ファイルには独自のゲームバージョンを設定できません。バージョンは親ファイルから継承されます".to_string(),
            });
        }

        for tag in tags {
            self.game_versions.insert(tag.as_ref().to_string());
        }

        Ok(())
    }

    /// Marks the file as supporting the given mod loaders. Mod loaders are
    /// treated as game versions by the platform.
    pub fn add_mod_loader<S: AsRef<str>>(
        &mut self,
        loaders: impl IntoIterator<Item = S>,
    ) -> Result<(), PublishError> {
        self.add_game_version(loaders)
    }

    /// Marks the file as supporting the given Java versions. Java versions
    /// are treated as game versions by the platform.
    pub fn add_java_version<S: AsRef<str>>(
        &mut self,
        versions: impl IntoIterator<Item = S>,
    ) -> Result<(), PublishError> {
        self.add_game_version(versions)
    }

    /// Define or change a relation to another project.
    ///
    /// Unknown relation types are accepted and passed through to the
    /// platform, which is the final validator; they only produce a warning.
    /// An empty type removes an existing relation. Changing the type of an
    /// existing relation also produces a warning.
    pub fn add_relation(&mut self, slug: &str, relation_type: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        // CurseForge slugs are lowercase alphanumerics and hyphens. A non
        // conforming slug is almost always a typo, but the slug itself can
        // not be verified against the API so it is let through.
        let slug_pattern = Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap();
        if !slug_pattern.is_match(slug) {
            warnings.push(format!(
                "プロジェクトスラッグ {slug} の形式が一般的ではありません。綴りを確認してください"
            ));
        }

        if relation_type.is_empty() {
            if self.relations.remove(slug).is_some() {
                warnings.push(format!("プロジェクト {slug} との関係を削除しました"));
            }
            return warnings;
        }

        if !is_known_relation_type(relation_type) {
            warnings.push(format!(
                "プロジェクト {slug} に未知の関係タイプ {relation_type} が定義されました"
            ));
        }

        if let Some(existing) = self.relations.get(slug)
            && existing != relation_type
        {
            warnings.push(format!(
                "プロジェクト {slug} の関係タイプを {existing} から {relation_type} に変更します"
            ));
        }

        self.relations
            .insert(slug.to_string(), relation_type.to_string());

        warnings
    }

    /// Marks other projects as required for this file to work.
    pub fn add_requirement<S: AsRef<str>>(
        &mut self,
        slugs: impl IntoIterator<Item = S>,
    ) -> Vec<String> {
        self.add_relations(RELATION_REQUIRED, slugs)
    }

    /// Marks other projects as having special but optional support.
    pub fn add_optional<S: AsRef<str>>(
        &mut self,
        slugs: impl IntoIterator<Item = S>,
    ) -> Vec<String> {
        self.add_relations(RELATION_OPTIONAL, slugs)
    }

    /// Marks other projects as incompatible with this file.
    pub fn add_incompatibility<S: AsRef<str>>(
        &mut self,
        slugs: impl IntoIterator<Item = S>,
    ) -> Vec<String> {
        self.add_relations(RELATION_INCOMPATIBLE, slugs)
    }

    /// Marks other projects as embedded within this file.
    pub fn add_embedded<S: AsRef<str>>(
        &mut self,
        slugs: impl IntoIterator<Item = S>,
    ) -> Vec<String> {
        self.add_relations(RELATION_EMBEDDED, slugs)
    }

    /// Marks other projects as tools for this file.
    pub fn add_tool<S: AsRef<str>>(
        &mut self,
        slugs: impl IntoIterator<Item = S>,
    ) -> Vec<String> {
        self.add_relations(RELATION_TOOL, slugs)
    }

    fn add_relations<S: AsRef<str>>(
        &mut self,
        relation_type: &str,
        slugs: impl IntoIterator<Item = S>,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        for slug in slugs {
            warnings.extend(self.add_relation(slug.as_ref(), relation_type));
        }
        warnings
    }

    /// Prepare the artifact for upload.
    ///
    /// Verifies the source file exists, validates the enum-like properties
    /// (unknown values are warnings, the platform is the final validator),
    /// and resolves the requested game versions through the catalog on
    /// top-level nodes. Children never resolve versions, the platform
    /// derives theirs from the parent.
    pub fn prepare(&mut self, catalog: &VersionCatalog) -> Result<Vec<String>, PublishError> {
        if !self.source.exists() {
            return Err(PublishError::MissingFile {
                path: self.source.clone(),
            });
        }

        let mut warnings = Vec::new();
        let file_name = self.file_name();

        if !is_known_changelog_type(&self.changelog_type) {
            warnings.push(format!(
                "{} の変更履歴タイプ {} は認識されていません。問題が起きる可能性があります",
                file_name, self.changelog_type
            ));
        }

        if !is_known_release_type(&self.release_type) {
            warnings.push(format!(
                "{} のリリースタイプ {} は認識されていません。問題が起きる可能性があります",
                file_name, self.release_type
            ));
        }

        for (slug, relation_type) in &self.relations {
            if !is_known_relation_type(relation_type) {
                warnings.push(format!(
                    "{file_name} のプロジェクト {slug} への関係タイプ {relation_type} は認識されていません"
                ));
            }
        }

        if !self.is_child {
            self.resolved_version_ids = Some(catalog.resolve(&self.game_versions)?);
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{VersionTypeFilter, VersionType};
    use crate::catalog::version_catalog::GameVersion;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn test_catalog() -> VersionCatalog {
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
        catalog
    }

    fn temp_artifact() -> (NamedTempFile, ArtifactNode) {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "jar bytes").unwrap();
        let node = ArtifactNode::new(123456, file.path());
        (file, node)
    }

    #[test]
    fn test_new_artifact_defaults() {
        let node = ArtifactNode::new(123456, "mod.jar");

        assert_eq!(node.project_id(), 123456);
        assert!(!node.is_child());
        assert_eq!(node.changelog_type, CHANGELOG_TEXT);
        assert_eq!(node.release_type, RELEASE_TYPE_ALPHA);
        assert!(node.changelog.is_none());
        assert!(node.remote_file_id().is_none());
        assert!(node.resolved_version_ids().is_none());
    }

    #[test]
    fn test_child_inherits_metadata() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        node.changelog = Some("Fixed things".to_string());
        node.changelog_type = "markdown".to_string();
        node.release_type = "beta".to_string();
        node.add_relation("some-library", RELATION_REQUIRED);

        let child = node.with_additional_file("mod-sources.jar").unwrap();

        assert!(child.is_child());
        assert_eq!(child.project_id(), 123456);
        assert_eq!(child.changelog.as_deref(), Some("Fixed things"));
        assert_eq!(child.changelog_type, "markdown");
        assert_eq!(child.release_type, "beta");
        assert_eq!(
            child.relations().get("some-library").map(String::as_str),
            Some(RELATION_REQUIRED)
        );
    }

    #[test]
    fn test_child_relations_are_independent_copies() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        node.add_relation("some-library", RELATION_REQUIRED);

        let child = node.with_additional_file("mod-sources.jar").unwrap();
        child.add_relation("some-library", "");

        assert!(node.children()[0].relations().is_empty());
        assert!(node.relations().contains_key("some-library"));
    }

    #[test]
    fn test_nesting_limit() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        let child = node.with_additional_file("mod-sources.jar").unwrap();

        let result = child.with_additional_file("mod-javadoc.jar");
        assert!(matches!(result, Err(PublishError::InvalidNesting)));
    }

    #[test]
    fn test_child_can_not_set_versions() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        let child = node.with_additional_file("mod-sources.jar").unwrap();

        let result = child.add_game_version(["1.20.1"]);
        assert!(matches!(
            result,
            Err(PublishError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_add_game_version_collects_tags() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        node.add_game_version(["1.20.1", "Forge"]).unwrap();
        node.add_mod_loader(["Fabric"]).unwrap();
        node.add_java_version(["Java 17"]).unwrap();

        assert_eq!(node.game_versions().len(), 4);
        assert!(node.game_versions().contains("Fabric"));
        assert!(node.game_versions().contains("Java 17"));
    }

    #[test]
    fn test_relation_upsert_and_removal() {
        let mut node = ArtifactNode::new(123456, "mod.jar");

        let warnings = node.add_relation("some-library", RELATION_REQUIRED);
        assert!(warnings.is_empty());

        let warnings = node.add_relation("some-library", "");
        assert_eq!(warnings.len(), 1);
        assert!(!node.relations().contains_key("some-library"));
    }

    #[test]
    fn test_relation_removal_of_absent_slug_is_silent() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        let warnings = node.add_relation("never-added", "");

        assert!(warnings.is_empty());
        assert!(node.relations().is_empty());
    }

    #[test]
    fn test_relation_type_change_warns() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        node.add_relation("some-library", RELATION_REQUIRED);

        let warnings = node.add_relation("some-library", RELATION_OPTIONAL);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(RELATION_REQUIRED));
        assert_eq!(
            node.relations().get("some-library").map(String::as_str),
            Some(RELATION_OPTIONAL)
        );
    }

    #[test]
    fn test_unknown_relation_type_passes_through_with_warning() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        let warnings = node.add_relation("some-library", "bestFriend");

        assert_eq!(warnings.len(), 1);
        assert_eq!(
            node.relations().get("some-library").map(String::as_str),
            Some("bestFriend")
        );
    }

    #[test]
    fn test_suspicious_slug_warns() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        let warnings = node.add_relation("Some_Library!", RELATION_REQUIRED);

        assert_eq!(warnings.len(), 1);
        assert!(node.relations().contains_key("Some_Library!"));
    }

    #[test]
    fn test_relation_helpers() {
        let mut node = ArtifactNode::new(123456, "mod.jar");
        node.add_requirement(["lib-a"]);
        node.add_optional(["lib-b"]);
        node.add_incompatibility(["lib-c"]);
        node.add_embedded(["lib-d"]);
        node.add_tool(["lib-e"]);

        assert_eq!(node.relations().len(), 5);
        assert_eq!(
            node.relations().get("lib-c").map(String::as_str),
            Some(RELATION_INCOMPATIBLE)
        );
    }

    #[test]
    fn test_prepare_missing_file() {
        let catalog = test_catalog();
        let mut node = ArtifactNode::new(123456, "/nonexistent/mod.jar");

        let result = node.prepare(&catalog);
        assert!(matches!(result, Err(PublishError::MissingFile { .. })));
    }

    #[test]
    fn test_prepare_resolves_versions() {
        let catalog = test_catalog();
        let (_file, mut node) = temp_artifact();
        node.add_game_version(["1.20.1"]).unwrap();

        let warnings = node.prepare(&catalog).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(
            node.resolved_version_ids().unwrap(),
            &[100].into_iter().collect::<BTreeSet<i64>>()
        );
    }

    #[test]
    fn test_prepare_fails_on_unresolved_tag() {
        let catalog = test_catalog();
        let (_file, mut node) = temp_artifact();
        node.add_game_version(["1.99.9"]).unwrap();

        let result = node.prepare(&catalog);
        assert!(matches!(
            result,
            Err(PublishError::UnresolvedVersion { .. })
        ));
        assert!(node.resolved_version_ids().is_none());
    }

    #[test]
    fn test_prepare_warns_on_unknown_enum_values() {
        let catalog = test_catalog();
        let (_file, mut node) = temp_artifact();
        node.changelog_type = "asciidoc".to_string();
        node.release_type = "nightly".to_string();
        node.add_relation("some-library", "bestFriend");

        let warnings = node.prepare(&catalog).unwrap();
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_prepare_on_child_skips_version_resolution() {
        let catalog = test_catalog();
        let mut child_file = NamedTempFile::new().unwrap();
        write!(child_file, "jar bytes").unwrap();

        let (_file, mut node) = temp_artifact();
        node.with_additional_file(child_file.path()).unwrap();

        let warnings = node.child_mut(0).prepare(&catalog).unwrap();
        assert!(warnings.is_empty());
        assert!(node.children()[0].resolved_version_ids().is_none());
    }
}
