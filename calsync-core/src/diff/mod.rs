//! Reconciliation between the feed and the remote store.

mod diff_kind;
mod event_update;
mod sync_plan;

pub use diff_kind::DiffKind;
pub use event_update::{EventUpdate, Field, FieldChange};
pub use sync_plan::{SyncPlan, SyncStats, reconcile};
