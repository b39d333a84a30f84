//! # Hearth Core
//!
//! The calendar synchronization engine: pure schema translation, conflict
//! detection/resolution, and the orchestration that turns a sync request
//! into a [`hearth_domain::SyncResult`].
//!
//! ## Architecture
//! - Depends only on `hearth-domain` and the async runtime surface
//! - All I/O goes through the port traits in [`sync::ports`]
//! - Adapters (HTTP, OAuth, keyring) live in `hearth-infra`

pub mod sync;

pub use sync::conflict::{classify, resolve, Resolution, ResolutionAction, Winner};
pub use sync::engine::SyncEngine;
pub use sync::ports::{RemoteCalendar, SyncStateStore, TokenProvider};
pub use sync::translator::{apply_remote, to_local, to_remote};
