use std::fmt;

use crate::event::{FeedEvent, RemoteEvent, UpdateTarget};
use crate::remote::protocol::format_instant;

/// Fields compared between a feed event and its remote counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Start,
    End,
    Location,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Start => "start",
            Field::End => "end",
            Field::Location => "location",
            Field::Description => "description",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: Field,
    pub old: String,
    pub new: String,
}

/// A remote event that needs the feed's current values written over it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventUpdate {
    pub target: UpdateTarget,
    pub event: FeedEvent,
    pub changes: Vec<FieldChange>,
}

impl EventUpdate {
    /// Returns `None` when all compared fields already match.
    pub fn between(remote: &RemoteEvent, event: &FeedEvent) -> Option<Self> {
        let changes = field_changes(remote, event);
        if changes.is_empty() {
            return None;
        }

        Some(EventUpdate {
            target: UpdateTarget::from(remote),
            event: event.clone(),
            changes,
        })
    }
}

fn field_changes(remote: &RemoteEvent, event: &FeedEvent) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    let mut compare = |field: Field, old: &str, new: &str| {
        if old != new {
            changes.push(FieldChange {
                field,
                old: old.to_string(),
                new: new.to_string(),
            });
        }
    };

    compare(Field::Title, remote.title(), &event.title);
    compare(
        Field::Start,
        &format_instant(&remote.start),
        &format_instant(&event.start),
    );
    let remote_end = remote.end.as_ref().map(format_instant).unwrap_or_default();
    compare(Field::End, &remote_end, &format_instant(&event.end));
    compare(Field::Location, &remote.location, &event.location);
    compare(Field::Description, remote.description_text(), &event.description);

    changes
}
