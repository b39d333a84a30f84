//! OAuth2 credential lifecycle for the remote calendar provider.
//!
//! [`OAuthClient`] speaks the authorization-code grant against configurable
//! endpoints, [`CredentialStore`] abstracts where the resulting [`TokenSet`]
//! lives (OS keyring in production, memory in tests), and [`TokenManager`]
//! ties both together per account, implementing the core `TokenProvider`
//! port.

pub mod client;
pub mod store;
pub mod token_manager;
pub mod types;

pub use client::{OAuthClient, OAuthConfig};
pub use store::{CredentialStore, KeyringCredentialStore, MemoryCredentialStore};
pub use token_manager::TokenManager;
pub use types::{TokenResponse, TokenSet};
