//! HTTP client for the CurseForge API
//!
//! One client instance serves a whole publish run: the two catalog fetches
//! and every file upload. All requests carry a fixed user agent and the
//! API token header; responses are transparently gunzipped by reqwest
//! before JSON parsing. There are no retries and no timeout beyond the
//! transport defaults.

use crate::artifact::Metadata;
use crate::catalog::{GameVersion, VersionType};
use crate::core::constants::{API_TOKEN_HEADER, USER_AGENT};
use crate::core::error::PublishError;
use crate::upload::response::decode_upload_response;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Async client for the game API
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ApiClient {
    /// Create a client for the given game endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PublishError::Configuration {
                message: format!("HTTPクライアントを初期化できません: {e}"),
            })?;

        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }

        Ok(Self { http, endpoint })
    }

    /// The configured endpoint without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Fetch the version types valid for this game.
    pub async fn fetch_version_types(
        &self,
        token: &SecretString,
    ) -> Result<Vec<VersionType>, PublishError> {
        self.get_json("/api/game/version-types", token).await
    }

    /// Fetch the full version list for this game.
    pub async fn fetch_versions(
        &self,
        token: &SecretString,
    ) -> Result<Vec<GameVersion>, PublishError> {
        self.get_json("/api/game/versions", token).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, PublishError> {
        let response = self
            .http
            .get(self.url(path))
            .header(API_TOKEN_HEADER, token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Network {
                message: format!("{path} への GET が HTTP {status} を返しました"),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Upload a file to a project.
    ///
    /// Sends a multipart POST with a JSON `metadata` part and a binary
    /// `file` part, then decodes the response into the new file ID.
    pub async fn upload_file(
        &self,
        token: &SecretString,
        project_id: i64,
        metadata: &Metadata,
        file: &Path,
    ) -> Result<i64, PublishError> {
        let metadata_json =
            serde_json::to_string(metadata).map_err(|e| PublishError::Configuration {
                message: format!("アップロードメタデータをシリアライズできません: {e}"),
            })?;

        let bytes = tokio::fs::read(file)
            .await
            .map_err(|_| PublishError::MissingFile {
                path: file.to_path_buf(),
            })?;

        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());

        let form = Form::new()
            .part("metadata", Part::text(metadata_json).mime_str("application/json")?)
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .http
            .post(self.url(&format!("/api/projects/{project_id}/upload-file")))
            .header(API_TOKEN_HEADER, token.expose_secret())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        decode_upload_response(status, content_type.as_deref(), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_is_stripped() {
        let client = ApiClient::new("https://minecraft.curseforge.com/").unwrap();
        assert_eq!(client.endpoint(), "https://minecraft.curseforge.com");
    }

    #[test]
    fn test_url_building() {
        let client = ApiClient::new("https://minecraft.curseforge.com").unwrap();
        assert_eq!(
            client.url("/api/projects/123456/upload-file"),
            "https://minecraft.curseforge.com/api/projects/123456/upload-file"
        );
    }
}
