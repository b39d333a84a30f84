//! Token manager with automatic refresh
//!
//! Manages the OAuth token lifecycle for one account:
//! - Token retrieval from the credential store (cached in memory)
//! - Auto-refresh before expiry (configurable threshold, default 5 min)
//! - Best-effort revocation with unconditional local clearing

use std::sync::Arc;

use async_trait::async_trait;
use hearth_core::TokenProvider;
use hearth_domain::constants::DEFAULT_REFRESH_THRESHOLD_SECS;
use hearth_domain::{Result, SyncError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::OAuthClient;
use super::store::CredentialStore;
use super::types::TokenSet;

/// Per-account OAuth token lifecycle manager.
///
/// State machine: unauthenticated → authenticated (successful exchange) →
/// expired (clock) → authenticated (refresh) or unauthenticated (revoke, or
/// a refresh the provider definitively rejects).
pub struct TokenManager {
    client: OAuthClient,
    store: Arc<dyn CredentialStore>,
    account: String,
    cached: RwLock<Option<TokenSet>>,
    refresh_threshold_seconds: i64,
}

impl TokenManager {
    /// Create a manager for the given account.
    #[must_use]
    pub fn new(
        client: OAuthClient,
        store: Arc<dyn CredentialStore>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            account: account.into(),
            cached: RwLock::new(None),
            refresh_threshold_seconds: DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }

    /// Refresh tokens this many seconds before expiry.
    #[must_use]
    pub fn with_refresh_threshold(mut self, seconds: i64) -> Self {
        self.refresh_threshold_seconds = seconds;
        self
    }

    /// The account this manager serves.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Build the browser authorization URL.
    ///
    /// # Errors
    /// Returns `Config` when the client id is unset.
    pub fn authorization_url(&self) -> Result<String> {
        self.client.authorization_url()
    }

    /// Exchange an authorization code and persist the resulting tokens.
    ///
    /// # Errors
    /// Returns `AuthExchange` when the provider rejects the code.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        let tokens = self.client.exchange_code(code).await?;
        self.store.set(&self.account, &tokens).await?;
        *self.cached.write().await = Some(tokens.clone());
        info!(account = %self.account, "authorization code exchanged; tokens stored");
        Ok(tokens)
    }

    /// Return a valid access token, refreshing if it is expired or close to
    /// expiry.
    ///
    /// A refresh the provider definitively rejects clears the stored
    /// credentials (the transition back to unauthenticated); transient
    /// refresh failures leave them in place for a later retry.
    ///
    /// # Errors
    /// Returns `ReauthRequired` when no credential or refresh token exists
    /// or the refresh is rejected; `Transient` when the provider is
    /// unreachable.
    pub async fn ensure_valid(&self) -> Result<String> {
        let Some(tokens) = self.load().await? else {
            return Err(SyncError::ReauthRequired(format!(
                "account {} is not connected",
                self.account
            )));
        };

        if !tokens.is_expired(self.refresh_threshold_seconds) {
            return Ok(tokens.access_token);
        }

        debug!(account = %self.account, "access token expired or near expiry; refreshing");
        let Some(refresh_token) = tokens.refresh_token.clone() else {
            return Err(SyncError::ReauthRequired(
                "no refresh token available for expired credential".to_string(),
            ));
        };

        match self.client.refresh(&refresh_token).await {
            Ok(mut refreshed) => {
                // Providers may omit the refresh token on renewal; keep the
                // one we already hold.
                if refreshed.refresh_token.is_none() {
                    refreshed.refresh_token = Some(refresh_token);
                }
                self.store.set(&self.account, &refreshed).await?;
                let access_token = refreshed.access_token.clone();
                *self.cached.write().await = Some(refreshed);
                info!(account = %self.account, "access token refreshed");
                Ok(access_token)
            }
            Err(err @ SyncError::ReauthRequired(_)) => {
                warn!(account = %self.account, error = %err, "refresh rejected; clearing credentials");
                self.clear_local().await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Whether a non-expired or refreshable credential is present.
    pub async fn is_authenticated(&self) -> bool {
        match self.load().await {
            Ok(Some(tokens)) => {
                !tokens.is_expired(self.refresh_threshold_seconds) || tokens.refresh_token.is_some()
            }
            _ => false,
        }
    }

    /// Revoke the credential remotely (best effort) and clear it locally.
    ///
    /// Remote revocation failures are logged and swallowed; the local
    /// clearing below is unconditional. This is documented policy, not an
    /// accidental omission.
    ///
    /// # Errors
    /// Returns error only when the local store cannot be cleared.
    pub async fn revoke(&self) -> Result<()> {
        if let Ok(Some(tokens)) = self.load().await {
            if let Err(err) = self.client.revoke(&tokens.access_token).await {
                warn!(account = %self.account, error = %err, "remote token revocation failed; clearing local credentials anyway");
            }
        }
        self.clear_local().await?;
        info!(account = %self.account, "credentials cleared");
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenSet>> {
        if let Some(tokens) = self.cached.read().await.clone() {
            return Ok(Some(tokens));
        }

        let tokens = self.store.get(&self.account).await?;
        if let Some(tokens) = &tokens {
            *self.cached.write().await = Some(tokens.clone());
        }
        Ok(tokens)
    }

    async fn clear_local(&self) -> Result<()> {
        *self.cached.write().await = None;
        self.store.clear(&self.account).await
    }
}

#[async_trait]
impl TokenProvider for TokenManager {
    async fn ensure_valid(&self) -> Result<String> {
        self.ensure_valid().await
    }

    async fn is_authenticated(&self) -> bool {
        self.is_authenticated().await
    }

    async fn revoke(&self) -> Result<()> {
        self.revoke().await
    }
}
