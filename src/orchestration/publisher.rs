//! Publish orchestrator
//!
//! Sequences a whole publish run: catalog refresh, optional version hint
//! detection, then per artifact preparation, serialization, and upload.
//! Parents always upload before their children so the child metadata can
//! carry the parent's file ID. Everything is strictly sequential and
//! fail-fast: the first error aborts the remaining pipeline, files already
//! uploaded stay uploaded, and nothing is retried.

use crate::artifact::{ArtifactNode, build_metadata};
use crate::catalog::{VersionCatalog, VersionTypeFilter};
use crate::core::coerce::{to_project_id, to_text, to_version_tag};
use crate::core::config::{PublishConfig, PublishManifest};
use crate::core::error::PublishError;
use crate::detection::VersionHintSource;
use crate::orchestration::state::{PublishState, StateTracker};
use crate::upload::ApiClient;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;

/// One successfully uploaded file
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub project_id: i64,
    pub file_id: i64,
    pub file_name: String,

    /// Set when this file was uploaded as a child of another file.
    pub parent_file_id: Option<i64>,
}

/// Report returned after a successful publish run
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub uploaded: Vec<UploadedFile>,
    pub warnings: Vec<String>,
    pub duration: u64,
    pub state: PublishState,
    pub finished_at: DateTime<Utc>,
}

/// Orchestrator for one publish run
pub struct PublishOrchestrator {
    config: PublishConfig,
    client: ApiClient,
    catalog: VersionCatalog,
    artifacts: Vec<ArtifactNode>,
    hint_source: Option<Box<dyn VersionHintSource>>,
    state: StateTracker,
}

impl PublishOrchestrator {
    /// Create an orchestrator with the default version type filter.
    pub fn new(config: PublishConfig) -> Result<Self, PublishError> {
        Self::with_type_filter(config, VersionTypeFilter::default())
    }

    /// Create an orchestrator with an explicit version type filter.
    pub fn with_type_filter(
        config: PublishConfig,
        filter: VersionTypeFilter,
    ) -> Result<Self, PublishError> {
        let client = ApiClient::new(config.api_endpoint.clone())?;

        Ok(Self {
            config,
            client,
            catalog: VersionCatalog::new(filter),
            artifacts: Vec::new(),
            hint_source: None,
            state: StateTracker::new(),
        })
    }

    /// Attach a version hint source. Hints are only applied when version
    /// detection is enabled in the configuration.
    pub fn with_hint_source(mut self, source: Box<dyn VersionHintSource>) -> Self {
        self.hint_source = Some(source);
        self
    }

    /// Define a new top-level artifact to publish.
    ///
    /// Returns the artifact for further configuration such as defining a
    /// changelog or additional files.
    pub fn upload(&mut self, project_id: i64, source: impl Into<PathBuf>) -> &mut ArtifactNode {
        self.artifacts.push(ArtifactNode::new(project_id, source));
        let index = self.artifacts.len() - 1;
        &mut self.artifacts[index]
    }

    /// The configured top-level artifacts.
    pub fn artifacts(&self) -> &[ArtifactNode] {
        &self.artifacts
    }

    /// Current pipeline state.
    pub fn state(&self) -> PublishState {
        self.state.current()
    }

    /// Timestamped transition history for diagnostics.
    pub fn history(&self) -> String {
        self.state.history()
    }

    /// Configure a top-level artifact and its additional files from a
    /// publish manifest. Returns the warnings produced while applying
    /// relations.
    pub fn add_manifest(&mut self, manifest: &PublishManifest) -> Result<Vec<String>, PublishError> {
        let mut warnings = Vec::new();
        let project_id = to_project_id(&manifest.project_id)?;

        let node = self.upload(project_id, &manifest.file);

        if let Some(changelog) = &manifest.changelog {
            node.changelog = Some(to_text(changelog)?);
        }
        if let Some(changelog_type) = &manifest.changelog_type {
            node.changelog_type = changelog_type.clone();
        }
        if let Some(display_name) = &manifest.display_name {
            node.display_name = Some(display_name.clone());
        }
        if let Some(release_type) = &manifest.release_type {
            node.release_type = release_type.clone();
        }

        for version in &manifest.game_versions {
            let tag = to_version_tag(version)?;
            node.add_game_version([tag])?;
        }

        for (slug, relation_type) in &manifest.relations {
            warnings.extend(node.add_relation(slug, relation_type));
        }

        for additional in &manifest.additional_files {
            let child = node.with_additional_file(&additional.file)?;

            if let Some(changelog) = &additional.changelog {
                child.changelog = Some(to_text(changelog)?);
            }
            if let Some(changelog_type) = &additional.changelog_type {
                child.changelog_type = changelog_type.clone();
            }
            if let Some(display_name) = &additional.display_name {
                child.display_name = Some(display_name.clone());
            }
            if let Some(release_type) = &additional.release_type {
                child.release_type = release_type.clone();
            }

            for (slug, relation_type) in &additional.relations {
                warnings.extend(child.add_relation(slug, relation_type));
            }
        }

        Ok(warnings)
    }

    /// Publish all configured artifacts.
    ///
    /// # Returns
    ///
    /// A report with every uploaded file and the warnings collected along
    /// the way. The first error aborts the remaining pipeline; already
    /// uploaded files stay uploaded.
    pub async fn publish(&mut self) -> Result<PublishReport, PublishError> {
        let start_time = Instant::now();
        let mut warnings = Vec::new();
        let mut uploaded = Vec::new();

        match self.run(&mut warnings, &mut uploaded).await {
            Ok(()) => {
                self.state.transition(PublishState::Completed, None);

                Ok(PublishReport {
                    uploaded,
                    warnings,
                    duration: start_time.elapsed().as_millis() as u64,
                    state: PublishState::Completed,
                    finished_at: Utc::now(),
                })
            }
            Err(error) => {
                self.state
                    .transition(PublishState::Failed, Some(error.to_string()));
                Err(error)
            }
        }
    }

    async fn run(
        &mut self,
        warnings: &mut Vec<String>,
        uploaded: &mut Vec<UploadedFile>,
    ) -> Result<(), PublishError> {
        // An API token is required before any network call is made.
        let token = self
            .config
            .api_token
            .clone()
            .ok_or_else(|| PublishError::Configuration {
                message: "APIトークンが設定されていません".to_string(),
            })?;

        self.state.transition(PublishState::Initializing, None);
        warnings.extend(self.catalog.refresh(&self.client, &token).await?);

        let hints = if self.config.version_detection {
            match &self.hint_source {
                Some(source) => {
                    source
                        .collect()
                        .await
                        .map_err(|e| PublishError::Configuration {
                            message: format!("バージョン検出に失敗しました: {e}"),
                        })?
                }
                None => Vec::new(),
            }
        } else {
            Vec::new()
        };
        apply_hints(&self.catalog, &mut self.artifacts, &hints)?;

        for index in 0..self.artifacts.len() {
            let file_name = self.artifacts[index].file_name();
            let project_id = self.artifacts[index].project_id();

            self.state
                .transition(PublishState::Preparing, Some(file_name.clone()));
            let prepare_warnings = self.artifacts[index].prepare(&self.catalog)?;
            warnings.extend(prepare_warnings);

            let metadata = build_metadata(&self.artifacts[index], None)?;
            self.state
                .transition(PublishState::Uploading, Some(file_name.clone()));
            let source = self.artifacts[index].source().to_path_buf();
            let file_id = self
                .client
                .upload_file(&token, project_id, &metadata, &source)
                .await?;
            self.artifacts[index].set_remote_file_id(file_id);
            uploaded.push(UploadedFile {
                project_id,
                file_id,
                file_name,
                parent_file_id: None,
            });

            // Children upload after their parent, in declaration order,
            // carrying the parent's file ID.
            for child_index in 0..self.artifacts[index].children().len() {
                let child_name = self.artifacts[index].children()[child_index].file_name();

                self.state
                    .transition(PublishState::Preparing, Some(child_name.clone()));
                let child_warnings = self.artifacts[index]
                    .child_mut(child_index)
                    .prepare(&self.catalog)?;
                warnings.extend(child_warnings);

                let metadata =
                    build_metadata(&self.artifacts[index].children()[child_index], Some(file_id))?;
                self.state
                    .transition(PublishState::Uploading, Some(child_name.clone()));
                let child_source = self.artifacts[index].children()[child_index]
                    .source()
                    .to_path_buf();
                let child_id = self
                    .client
                    .upload_file(&token, project_id, &metadata, &child_source)
                    .await?;
                self.artifacts[index]
                    .child_mut(child_index)
                    .set_remote_file_id(child_id);
                uploaded.push(UploadedFile {
                    project_id,
                    file_id: child_id,
                    file_name: child_name,
                    parent_file_id: Some(file_id),
                });
            }
        }

        Ok(())
    }
}

/// Apply detected version hints to every top-level artifact.
///
/// A hint is only applied when the catalog can resolve it; everything else
/// is silently dropped, detection is best effort.
fn apply_hints(
    catalog: &VersionCatalog,
    artifacts: &mut [ArtifactNode],
    hints: &[String],
) -> Result<(), PublishError> {
    for hint in hints {
        if catalog.lookup(hint).is_none() {
            continue;
        }

        for artifact in artifacts.iter_mut() {
            artifact.add_game_version([hint.as_str()])?;
        }
    }

    Ok(())
}
