//! Conversions from external infrastructure errors into domain errors.

use hearth_domain::SyncError;
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SyncError);

impl From<InfraError> for SyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SyncError> for InfraError {
    fn from(value: SyncError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SyncError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let converted = if err.is_timeout() || err.is_connect() || err.is_request() {
            SyncError::Transient(format!("http transport failure: {err}"))
        } else if err.is_decode() {
            SyncError::InvalidInput(format!("failed to decode response body: {err}"))
        } else {
            SyncError::Internal(format!("http client failure: {err}"))
        };
        Self(converted)
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → SyncError */
/* -------------------------------------------------------------------------- */

impl From<KeyringError> for InfraError {
    fn from(err: KeyringError) -> Self {
        let converted = match err {
            KeyringError::NoEntry => {
                SyncError::NotFound("no credential stored for account".to_string())
            }
            KeyringError::Ambiguous(_) => {
                SyncError::Internal("ambiguous keyring entry for account".to_string())
            }
            other => SyncError::Internal(format!("keyring failure: {other}")),
        };
        Self(converted)
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SyncError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        Self(SyncError::InvalidInput(format!("serialization failure: {err}")))
    }
}
