//! Error handling for artifact publishing
//!
//! This module provides the error taxonomy for the publish pipeline using
//! the thiserror crate. Every variant is fatal and aborts the remaining
//! pipeline. Non-fatal findings are reported as warning strings instead,
//! see the catalog and artifact modules.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for publishing operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Configuration errors
    #[error("設定エラー: {message}")]
    Configuration { message: String },

    // Artifact errors
    #[error("アップロード対象のファイルが見つかりません: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("子アーティファクトに追加ファイルを定義することはできません（ネストは1段までです）")]
    InvalidNesting,

    #[error("不正な操作です: {message}")]
    InvalidOperation { message: String },

    // Version resolution errors
    #[error("バージョン {tag} はこのゲームでは有効ではありません")]
    UnresolvedVersion { tag: String },

    // Network errors
    #[error("ネットワークエラーが発生しました: {message}")]
    Network { message: String },

    // Upload errors
    #[error("CurseForge がアップロードを拒否しました（コード {code}）: {message}")]
    Upload { code: i64, message: String },
}

impl PublishError {
    /// Check if this error was produced by the remote API rather than by
    /// local configuration or validation.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Upload { .. })
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::Configuration { .. } => vec![
                "公開設定を確認してください",
                "APIトークンは環境変数 CURSEFORGE_API_TOKEN で設定できます",
            ],
            Self::MissingFile { .. } => vec![
                "ビルドが完了しているか確認してください",
                "マニフェストのファイルパスを確認してください",
            ],
            Self::InvalidNesting => {
                vec!["追加ファイルは必ずトップレベルのアーティファクトに定義してください"]
            }
            Self::InvalidOperation { .. } => {
                vec!["アーティファクトの設定を確認してください"]
            }
            Self::UnresolvedVersion { .. } => vec![
                "バージョン名またはスラッグの綴りを確認してください",
                "対象ゲームのエンドポイントが正しいか確認してください",
            ],
            Self::Network { .. } => vec![
                "インターネット接続を確認してください",
                "CurseForge のステータスを確認してください",
            ],
            Self::Upload { .. } => vec![
                "エラーメッセージを確認してください",
                "APIトークンにプロジェクトへの権限があるか確認してください",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::MissingFile { .. } => "MISSING_FILE",
            Self::InvalidNesting => "INVALID_NESTING",
            Self::InvalidOperation { .. } => "INVALID_OPERATION",
            Self::UnresolvedVersion { .. } => "UNRESOLVED_VERSION",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Upload { .. } => "UPLOAD_ERROR",
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = PublishError::Configuration {
            message: "APIトークンが設定されていません".to_string(),
        };

        assert_eq!(error.code(), "CONFIGURATION_ERROR");
        assert!(!error.is_remote());
        assert!(error.suggested_actions().len() >= 2);
    }

    #[test]
    fn test_missing_file_error_display() {
        let error = PublishError::MissingFile {
            path: PathBuf::from("build/libs/mod-1.0.0.jar"),
        };

        let display = format!("{}", error);
        assert!(display.contains("mod-1.0.0.jar"));
        assert_eq!(error.code(), "MISSING_FILE");
    }

    #[test]
    fn test_unresolved_version_error() {
        let error = PublishError::UnresolvedVersion {
            tag: "1.99.9".to_string(),
        };

        assert_eq!(error.code(), "UNRESOLVED_VERSION");
        assert!(error.to_string().contains("1.99.9"));
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|&a| a.contains("スラッグ")));
    }

    #[test]
    fn test_upload_error_with_platform_message() {
        let error = PublishError::Upload {
            code: 1006,
            message: "Invalid project".to_string(),
        };

        assert!(error.is_remote());
        assert_eq!(error.code(), "UPLOAD_ERROR");
        let display = error.to_string();
        assert!(display.contains("1006"));
        assert!(display.contains("Invalid project"));
    }

    #[test]
    fn test_network_error_is_remote() {
        let error = PublishError::Network {
            message: "connection refused".to_string(),
        };

        assert!(error.is_remote());
        assert_eq!(error.code(), "NETWORK_ERROR");
    }

    #[test]
    fn test_invalid_nesting_error() {
        let error = PublishError::InvalidNesting;

        assert_eq!(error.code(), "INVALID_NESTING");
        assert!(error.to_string().contains("ネスト"));
    }
}
