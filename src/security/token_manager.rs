//! API token handling
//!
//! Tokens are read from the environment and wrapped in `secrecy` types so
//! they never end up in logs or debug output by accident. A masking helper
//! is provided for the places that need to show which token was used.

use secrecy::SecretString;
use std::env;

/// Environment variables probed for the API token, in priority order.
const TOKEN_ENV_VARS: &[&str] = &["CURSEFORGE_API_TOKEN", "CURSE_API_TOKEN"];

/// Token manager for the CurseForge API
///
/// # Examples
///
/// ```
/// use curseforge_publisher::security::SecureTokenManager;
///
/// let manager = SecureTokenManager::new();
/// assert_eq!(manager.mask_token("abcdef123456"), "abc...456");
/// ```
#[derive(Default)]
pub struct SecureTokenManager {
    env_vars: Vec<String>,
}

impl SecureTokenManager {
    /// Creates a manager probing the default environment variables.
    pub fn new() -> Self {
        Self {
            env_vars: TOKEN_ENV_VARS.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Retrieves the API token from the environment.
    ///
    /// Returns `None` when no probed variable is set to a non-empty value.
    pub fn get_token(&self) -> Option<SecretString> {
        for variable in &self.env_vars {
            if let Ok(value) = env::var(variable)
                && !value.trim().is_empty()
            {
                return Some(SecretString::new(value.into()));
            }
        }

        None
    }

    /// Checks whether a token is available.
    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// Masks a token for safe logging.
    ///
    /// Shows only the first 3 and last 3 characters. Tokens shorter than
    /// 10 characters are fully masked as "****".
    pub fn mask_token(&self, token: &str) -> String {
        if token.len() < 10 {
            return "****".to_string();
        }

        format!("{}...{}", &token[..3], &token[token.len() - 3..])
    }
}
