//! Common data types used throughout the sync engine

pub mod event;
pub mod remote;
pub mod result;
pub mod settings;

pub use event::{CalendarEvent, EventCategory, EventStatus, Priority, Reminder, ReminderKind};
pub use remote::{
    CalendarInfo, RemoteEvent, RemoteEventDraft, RemoteEventStatus, RemoteEventWhen,
    RemoteReminder,
};
pub use result::{ConflictKind, SyncConflict, SyncResult};
pub use settings::{SyncDirection, SyncSettings};
