//! Remote calendar integration.
//!
//! [`CalendarTransport`] carries auth injection, throttle-aware retries,
//! and error categorization; [`RemoteCalendarClient`] builds the REST
//! surface on top of it, implementing the core `RemoteCalendar` port; and
//! [`CalendarSyncService`] wires both together with the token manager and
//! the engine into the per-account facade UI collaborators hold.

pub mod client;
pub mod service;
pub mod transport;
pub mod wire;

pub use client::RemoteCalendarClient;
pub use service::{CalendarConnectionStatus, CalendarSyncService};
pub use transport::CalendarTransport;
