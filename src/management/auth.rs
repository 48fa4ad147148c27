use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{Error, Result, config, spotify, types::Token};

/// Seconds before expiry at which a token is refreshed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// Source of the bearer token presented on every API request.
///
/// Orchestrators ask for the token once, before any network call, and fail
/// with [`Error::AuthRequired`] when none is available.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn bearer_token(&self) -> Option<String> {
        self.0.clone().filter(|t| !t.is_empty())
    }
}

/// Token cache in the local data directory, refreshed when close to expiry.
pub struct TokenManager {
    token: Mutex<Token>,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token: Mutex::new(token),
        }
    }

    pub async fn load() -> Result<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        let token: Token =
            serde_json::from_str(&content).map_err(|e| Error::Storage(e.to_string()))?;
        Ok(Self::new(token))
    }

    pub async fn persist(&self) -> Result<()> {
        let token = self.token.lock().await.clone();
        Self::write(&token).await
    }

    async fn write(token: &Token) -> Result<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| Error::Storage(e.to_string()))?;
        async_fs::write(path, json)
            .await
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Returns the access token, refreshing and re-persisting it first when it
    /// is about to expire. A failed refresh falls back to the cached token.
    pub async fn get_valid_token(&self) -> String {
        let mut token = self.token.lock().await;
        if Self::is_expired(&token) && !token.refresh_token.is_empty() {
            match spotify::auth::refresh_token(&token.refresh_token).await {
                Ok(new_token) => {
                    *token = new_token;
                    if let Err(e) = Self::write(&token).await {
                        tracing::warn!(error = %e, "Failed to persist refreshed token");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Token refresh failed"),
            }
        }

        token.access_token.clone()
    }

    pub fn is_expired(token: &Token) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= (token.obtained_at + token.expires_in).saturating_sub(REFRESH_MARGIN_SECS)
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

#[async_trait]
impl CredentialProvider for TokenManager {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.get_valid_token().await).filter(|t| !t.is_empty())
    }
}
