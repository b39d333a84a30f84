//! OAuth 2.0 token types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 access and refresh tokens with metadata
///
/// The stored credential blob: opaque to callers, keyed by account in the
/// [`crate::auth::CredentialStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    /// Optional because some providers don't issue them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for OAuth 2.0)
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC), calculated from `expires_in` at
    /// token creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a new `TokenSet` with calculated expiration time.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + chrono::Duration::seconds(expires_in))
        } else {
            None
        };

        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at,
            scope,
        }
    }

    /// Check if the access token is expired or will expire within the given
    /// threshold. Tokens without an expiry timestamp never count as expired.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let threshold = chrono::Duration::seconds(threshold_seconds);
                Utc::now() + threshold >= expires_at
            }
            None => false,
        }
    }

    /// Seconds until token expiration, or `None` when no expiry is set.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }
}

/// OAuth token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut tokens = Self::new(
            response.access_token,
            response.refresh_token,
            response.expires_in.unwrap_or(0),
            response.scope,
        );
        if let Some(token_type) = response.token_type {
            tokens.token_type = token_type;
        }
        tokens
    }
}

/// OAuth error response from the authorization server (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

impl std::fmt::Display for OAuthErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}
