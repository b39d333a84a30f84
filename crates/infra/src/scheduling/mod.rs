//! Background scheduling.

pub mod auto_sync;

pub use auto_sync::AutoSyncScheduler;
