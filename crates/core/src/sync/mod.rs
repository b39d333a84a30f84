//! Bidirectional calendar synchronization.
//!
//! The engine reconciles a locally-owned event store with an external
//! calendar provider: [`translator`] maps between the two schemas,
//! [`conflict`] classifies and resolves paired-event mismatches, and
//! [`engine`] orchestrates the phases of a sync run over the [`ports`].

pub mod conflict;
pub mod engine;
pub mod ports;
pub mod translator;
