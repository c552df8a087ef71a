//! Upload response decoding
//!
//! The upload endpoint answers a successful request with `{"id": <int>}`.
//! Rejections sometimes carry a structured JSON error body, but only when
//! the content type says so; otherwise the HTTP status line is all there
//! is. Decoding is kept free of any transport types so it can be tested
//! directly.

use crate::core::error::PublishError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Body of a successful upload response
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// The ID of the uploaded file. Not publicly visible until the file
    /// has been approved, but immediately usable as a parent file ID.
    pub id: i64,
}

/// Structured error body returned by the upload endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct UploadErrorResponse {
    #[serde(rename = "errorCode")]
    pub error_code: i64,

    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

/// Decode an upload response into a file ID or a fatal error.
///
/// Non-200 responses become `Upload` errors: the structured platform error
/// when the body is JSON and parses, the status code and reason phrase
/// otherwise. Uploads are never retried.
pub fn decode_upload_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: &str,
) -> Result<i64, PublishError> {
    if status == StatusCode::OK {
        let response: UploadResponse =
            serde_json::from_str(body).map_err(|e| PublishError::Network {
                message: format!("アップロード応答を解析できません: {e}"),
            })?;
        return Ok(response.id);
    }

    if content_type.is_some_and(|value| value.contains("json"))
        && let Ok(error) = serde_json::from_str::<UploadErrorResponse>(body)
    {
        return Err(PublishError::Upload {
            code: error.error_code,
            message: error.error_message,
        });
    }

    Err(PublishError::Upload {
        code: i64::from(status.as_u16()),
        message: status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string(),
    })
}
