//! Three-way diff between the feed and the remote store.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::diff::{DiffKind, EventUpdate};
use crate::event::{FeedEvent, RemoteEvent};

/// Writes needed to make the remote store mirror the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub to_create: Vec<FeedEvent>,
    pub to_update: Vec<EventUpdate>,
    pub to_delete: Vec<RemoteEvent>,
    /// Descriptions shared by more than one event on either side. Matching
    /// for these is ambiguous: the first remote event in list order wins.
    pub duplicate_descriptions: Vec<String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    pub fn count(&self, kind: DiffKind) -> usize {
        match kind {
            DiffKind::Create => self.to_create.len(),
            DiffKind::Update => self.to_update.len(),
            DiffKind::Delete => self.to_delete.len(),
        }
    }
}

/// Matches feed events to remote events by description.
///
/// - feed events with no remote match are created
/// - matched pairs are updated only if a compared field differs
/// - remote events with no feed match are deleted
pub fn reconcile(feed: &[FeedEvent], remote: &[RemoteEvent]) -> SyncPlan {
    let mut duplicates = BTreeSet::new();

    let mut remote_by_description: HashMap<&str, &RemoteEvent> = HashMap::new();
    for event in remote {
        match remote_by_description.entry(event.description_text()) {
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
            Entry::Occupied(_) => {
                duplicates.insert(event.description_text().to_string());
            }
        }
    }

    let mut feed_descriptions: HashSet<&str> = HashSet::new();
    for event in feed {
        if !feed_descriptions.insert(event.description.as_str()) {
            duplicates.insert(event.description.clone());
        }
    }

    let mut plan = SyncPlan::default();

    for event in feed {
        match remote_by_description.get(event.description.as_str()) {
            None => plan.to_create.push(event.clone()),
            Some(remote) => {
                if let Some(update) = EventUpdate::between(remote, event) {
                    plan.to_update.push(update);
                }
            }
        }
    }

    plan.to_delete = remote
        .iter()
        .filter(|e| !feed_descriptions.contains(e.description_text()))
        .cloned()
        .collect();

    plan.duplicate_descriptions = duplicates.into_iter().collect();

    plan
}

/// Number of writes that completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SyncStats {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted",
            self.created, self.updated, self.deleted
        )
    }
}
