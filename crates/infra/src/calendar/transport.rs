//! Authenticated transport for the remote calendar API.
//!
//! Every request goes out with a bearer token from the token provider and
//! comes back already categorized into the sync error taxonomy: 401 is
//! `ReauthRequired` and never retried, server errors and throttling (429)
//! are retried with exponential backoff and surface as `Transient` once
//! attempts run out, and any other 4xx is `Rejected` with the response body
//! carried verbatim. Requests are rebuilt per attempt, so a retry that
//! outlives the token's validity window picks up a fresh one.

use std::sync::Arc;
use std::time::Duration;

use hearth_core::TokenProvider;
use hearth_domain::{Result, SyncError};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);

/// Authenticated calendar API transport with a bounded retry policy.
pub struct CalendarTransport {
    http: Client,
    tokens: Arc<dyn TokenProvider>,
    max_attempts: usize,
    base_backoff: Duration,
}

impl CalendarTransport {
    /// Transport with the default retry policy.
    ///
    /// # Errors
    /// Returns error if the underlying client cannot be constructed.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Self::with_policy(tokens, DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_BACKOFF)
    }

    /// Transport with a custom retry policy (tests shrink both knobs).
    ///
    /// # Errors
    /// Returns error if the underlying client cannot be constructed.
    pub fn with_policy(
        tokens: Arc<dyn TokenProvider>,
        max_attempts: usize,
        base_backoff: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("hearth-sync/0.1")
            .no_proxy()
            .build()
            .map_err(|err| SyncError::from(InfraError::from(err)))?;

        Ok(Self { http, tokens, max_attempts: max_attempts.max(1), base_backoff })
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    /// Returns the categorized API failure, or `InvalidInput` when the
    /// success body does not decode.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T> {
        let response = self.execute(Method::GET, url, Some(query), None::<&()>, context).await?;
        decode_json(response, context).await
    }

    /// Send a JSON body and decode the JSON answer.
    ///
    /// # Errors
    /// Returns the categorized API failure, or `InvalidInput` when the
    /// success body does not decode.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        context: &str,
    ) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.execute(method, url, None, Some(body), context).await?;
        decode_json(response, context).await
    }

    /// DELETE a resource, accepting an empty success answer.
    ///
    /// # Errors
    /// Returns the categorized API failure.
    pub async fn delete(&self, url: &str, context: &str) -> Result<()> {
        self.execute(Method::DELETE, url, None, None::<&()>, context).await?;
        Ok(())
    }

    async fn execute<B>(
        &self,
        method: Method,
        url: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&B>,
        context: &str,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        for attempt in 1..=self.max_attempts {
            // Fresh token per attempt; backoff may outlast its validity.
            let token = self.tokens.ensure_valid().await?;

            let mut builder = self.http.request(method.clone(), url).bearer_auth(&token);
            if let Some(query) = query {
                builder = builder.query(query);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }

            debug!(attempt, %method, url, context, "sending calendar API request");

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if retryable_status(status) && attempt < self.max_attempts {
                        debug!(attempt, %status, context, "retryable answer; backing off");
                        self.back_off(attempt).await;
                        continue;
                    }
                    return categorize(response, context).await;
                }
                Err(err) => {
                    if retryable_transport(&err) && attempt < self.max_attempts {
                        debug!(attempt, error = %err, context, "transport failure; backing off");
                        self.back_off(attempt).await;
                        continue;
                    }
                    return Err(SyncError::from(InfraError::from(err)));
                }
            }
        }

        Err(SyncError::Internal(format!("{context}: retry loop exhausted without a result")))
    }

    async fn back_off(&self, attempt: usize) {
        let shift = u32::try_from(attempt.saturating_sub(1).min(8)).unwrap_or(8);
        let delay = self.base_backoff.saturating_mul(1_u32 << shift);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn retryable_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Map a final response into the sync error taxonomy.
async fn categorize(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(SyncError::ReauthRequired(format!(
            "{context}: remote calendar API returned 401"
        )));
    }
    if retryable_status(status) {
        return Err(SyncError::Transient(format!(
            "{context}: remote calendar API returned {status}"
        )));
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Rejected(format!("{context}: {status}: {body}")))
}

async fn decode_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    response
        .json()
        .await
        .map_err(|err| SyncError::InvalidInput(format!("{context}: invalid response body: {err}")))
}
