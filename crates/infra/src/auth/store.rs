//! Credential storage capability.
//!
//! Token persistence is abstracted behind [`CredentialStore`] so the engine
//! can run against the OS keyring in production and plain memory in tests,
//! keyed by account so multiple family accounts can sync side by side.

use std::collections::HashMap;

use async_trait::async_trait;
use hearth_domain::{Result, SyncError};
use keyring::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::TokenSet;
use crate::errors::InfraError;

/// Trait for credential storage operations
///
/// One opaque credential blob per account. Implementations must treat a
/// missing entry as `Ok(None)`, not an error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Retrieve the stored tokens for the account, if any.
    async fn get(&self, account: &str) -> Result<Option<TokenSet>>;

    /// Store tokens for the account, replacing any previous blob.
    async fn set(&self, account: &str, tokens: &TokenSet) -> Result<()>;

    /// Remove the account's tokens. Clearing an absent entry is not an
    /// error.
    async fn clear(&self, account: &str) -> Result<()>;
}

/// Credential store backed by the platform keyring
/// (macOS Keychain, Windows Credential Manager, Linux Secret Service).
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    /// Create a store scoped to the given keyring service name.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    fn entry(&self, account: &str) -> Result<Entry> {
        Entry::new(&self.service, account)
            .map_err(|err| SyncError::from(InfraError::from(err)))
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn get(&self, account: &str) -> Result<Option<TokenSet>> {
        let entry = self.entry(account)?;
        match entry.get_password() {
            Ok(blob) => {
                let tokens = serde_json::from_str(&blob)
                    .map_err(|err| SyncError::from(InfraError::from(err)))?;
                Ok(Some(tokens))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(SyncError::from(InfraError::from(err))),
        }
    }

    async fn set(&self, account: &str, tokens: &TokenSet) -> Result<()> {
        debug!(account, "storing OAuth tokens in keyring");
        let blob = serde_json::to_string(tokens)
            .map_err(|err| SyncError::from(InfraError::from(err)))?;
        self.entry(account)?
            .set_password(&blob)
            .map_err(|err| SyncError::from(InfraError::from(err)))
    }

    async fn clear(&self, account: &str) -> Result<()> {
        debug!(account, "clearing OAuth tokens from keyring");
        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(SyncError::from(InfraError::from(err))),
        }
    }
}

/// In-memory credential store for tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, TokenSet>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, account: &str) -> Result<Option<TokenSet>> {
        Ok(self.entries.read().await.get(account).cloned())
    }

    async fn set(&self, account: &str, tokens: &TokenSet) -> Result<()> {
        self.entries.write().await.insert(account.to_string(), tokens.clone());
        Ok(())
    }

    async fn clear(&self, account: &str) -> Result<()> {
        self.entries.write().await.remove(account);
        Ok(())
    }
}
