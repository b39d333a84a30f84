//! OAuth 2.0 client for the authorization-code grant with offline access.
//!
//! Handles authorization URL construction, authorization code exchange,
//! token refresh, and best-effort revocation against configurable endpoint
//! URLs (tests point them at a local mock server).

use hearth_domain::{Result, SyncError};
use reqwest::{Client, Response};
use url::Url;

use super::types::{OAuthErrorBody, TokenResponse, TokenSet};
use crate::errors::InfraError;

/// OAuth configuration for the calendar provider's authorization server.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub revocation_endpoint: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Google Calendar OAuth settings with the fixed read/write scope set.
    #[must_use]
    pub fn google(
        client_id: impl Into<String>,
        client_secret: Option<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            redirect_uri: redirect_uri.into(),
            authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            revocation_endpoint: "https://oauth2.googleapis.com/revoke".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/calendar.readonly".to_string(),
                "https://www.googleapis.com/auth/calendar.events".to_string(),
            ],
        }
    }

    /// Scopes as a space-separated string.
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

/// OAuth 2.0 client over the configured endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
}

impl OAuthClient {
    /// Create a new OAuth client, validating the configured endpoints.
    ///
    /// # Errors
    /// Returns `Config` if an endpoint is not a valid URL.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        for endpoint in [
            &config.authorization_endpoint,
            &config.token_endpoint,
            &config.revocation_endpoint,
        ] {
            Url::parse(endpoint).map_err(|err| {
                SyncError::Config(format!("invalid OAuth endpoint URL {endpoint}: {err}"))
            })?;
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .no_proxy()
            .build()
            .map_err(|err| SyncError::from(InfraError::from(err)))?;

        Ok(Self { config, http })
    }

    /// Build the browser authorization URL.
    ///
    /// Deterministic construction from client id, redirect URI, and the
    /// fixed scope set, requesting offline access so a refresh token is
    /// issued.
    ///
    /// # Errors
    /// Returns `Config` when the client id is unset.
    pub fn authorization_url(&self) -> Result<String> {
        if self.config.client_id.is_empty() {
            return Err(SyncError::Config("OAuth client id is not configured".to_string()));
        }

        let params = [
            ("response_type", "code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("redirect_uri", self.config.redirect_uri.clone()),
            ("scope", self.config.scope_string()),
            ("access_type", "offline".to_string()),
            ("prompt", "consent".to_string()),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", self.config.authorization_endpoint, query))
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// Returns `AuthExchange` on any non-2xx answer from the token
    /// endpoint.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        let mut params = vec![
            ("grant_type", "authorization_code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.clone()));
        }

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|err| SyncError::from(InfraError::from(err)))?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(SyncError::AuthExchange(detail));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|err| SyncError::AuthExchange(format!("invalid token response: {err}")))?;
        Ok(parsed.into())
    }

    /// Refresh an access token.
    ///
    /// # Errors
    /// Returns `ReauthRequired` when the provider rejects the refresh token
    /// (401 or any other 4xx, e.g. `invalid_grant`), `Transient` on server
    /// errors.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        if refresh_token.is_empty() {
            return Err(SyncError::ReauthRequired("no refresh token available".to_string()));
        }

        let mut params = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("refresh_token", refresh_token.to_string()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.clone()));
        }

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|err| SyncError::from(InfraError::from(err)))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(SyncError::Transient(format!(
                "token refresh failed with status {status}"
            )));
        }
        if !status.is_success() {
            let detail = error_detail(response).await;
            return Err(SyncError::ReauthRequired(format!("token refresh rejected: {detail}")));
        }

        let parsed: TokenResponse = response.json().await.map_err(|err| {
            SyncError::ReauthRequired(format!("invalid refresh response: {err}"))
        })?;
        Ok(parsed.into())
    }

    /// Revoke a token at the provider.
    ///
    /// # Errors
    /// Returns error on non-2xx; the token manager logs and swallows it.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.config.revocation_endpoint)
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|err| SyncError::from(InfraError::from(err)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Rejected(format!("token revocation failed with status {status}")))
        }
    }

    /// Access the client configuration.
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
}

async fn error_detail(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<OAuthErrorBody>(&body) {
        Ok(parsed) => format!("{status}: {parsed}"),
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => format!("{status}: {body}"),
    }
}
