//! Core of calsync: mirrors an iCalendar feed into a remote events API.
//!
//! - `feed` and `ics` read and parse the external calendar
//! - `session` and `remote` talk to the authenticated events API
//! - `diff` reconciles the two sides into a `SyncPlan`
//! - `sync` runs a whole pass

pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod feed;
pub mod ics;
pub mod remote;
pub mod session;
pub mod sync;

pub use config::{Credentials, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use event::{FeedEvent, LocalizedText, RemoteEvent, UpdateTarget};
pub use sync::{SyncReport, Syncer};
