//! Session reading and token handout.
//!
//! Tokens are ephemeral: providers are consulted immediately before
//! every authenticated request and callers must not cache the result,
//! since the session may expire or be replaced between requests.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the auth session boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No active session")]
    NoSession,

    #[error("Session token expired")]
    TokenExpired,

    #[error("Session store error: {0}")]
    Store(String),
}

/// Identity token set held by the ambient session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Identity token presented as the bearer credential
    pub id_token: String,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,
}

impl TokenSet {
    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}

/// Source of fresh bearer tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a currently valid identity token, or an [`AuthError`]
    /// if no usable session exists.
    async fn id_token(&self) -> Result<String, AuthError>;
}

/// Session file layout written by the external sign-in flow.
#[derive(Debug, Deserialize)]
struct SessionFile {
    tokens: SessionTokens,
}

#[derive(Debug, Deserialize)]
struct SessionTokens {
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

/// Token provider backed by the session file the external auth flow
/// maintains under the user config directory.
///
/// The file is re-read on every call so an expired or replaced session
/// is picked up without restarting the client.
pub struct SessionFileProvider {
    path: PathBuf,
}

impl SessionFileProvider {
    /// Provider over the default session path (`<config>/tenki/session.json`).
    pub fn new() -> Result<Self, AuthError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AuthError::Store("No config directory available".to_string()))?;
        Ok(Self {
            path: config_dir.join("tenki").join("session.json"),
        })
    }

    /// Provider over an explicit session file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_session(&self) -> Result<TokenSet, AuthError> {
        if !self.path.exists() {
            return Err(AuthError::NoSession);
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| AuthError::Store(e.to_string()))?;

        let file: SessionFile =
            serde_json::from_str(&raw).map_err(|e| AuthError::Store(e.to_string()))?;

        let id_token = file.tokens.id_token.ok_or(AuthError::NoSession)?;

        // A session without expiry metadata is trusted as-is; the backend
        // rejects stale tokens anyway.
        let token_set = TokenSet {
            id_token,
            expires_at: file.tokens.expires_at.unwrap_or(i64::MAX),
        };

        if token_set.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_set)
    }
}

#[async_trait]
impl TokenProvider for SessionFileProvider {
    async fn id_token(&self) -> Result<String, AuthError> {
        let token_set = self.read_session()?;
        tracing::debug!("Read session token from {}", self.path.display());
        Ok(token_set.id_token)
    }
}

/// Fixed-token provider for tests and embedding.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn id_token(&self) -> Result<String, AuthError> {
        Ok(self.token.clone())
    }
}
