//! Event types on both sides of the sync.
//!
//! `FeedEvent` is what the iCalendar feed publishes. `RemoteEvent` is what
//! the remote store holds, with its translatable fields split into
//! `LocalizedText` records that carry their own ids.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event read from the calendar feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    /// Only stable value the feed gives us; used as the matching key.
    pub description: String,
}

impl fmt::Display for FeedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Per-language variants of one translatable field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub id: Option<u64>,
    pub fi: String,
    pub en: String,
}

impl LocalizedText {
    /// The Finnish text, used for matching and comparison.
    pub fn primary(&self) -> &str {
        &self.fi
    }
}

/// An event stored in the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: u64,
    pub name: LocalizedText,
    pub start: DateTime<Utc>,
    /// Records saved without an end time come back with `to: null`.
    pub end: Option<DateTime<Utc>>,
    pub location: String,
    pub description: LocalizedText,
    pub organizer_id: Option<u64>,
}

impl RemoteEvent {
    pub fn title(&self) -> &str {
        self.name.primary()
    }

    pub fn description_text(&self) -> &str {
        self.description.primary()
    }
}

impl fmt::Display for RemoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.title(), self.id)
    }
}

/// Remote records an update has to address: the event itself and the
/// localized rows of its name and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTarget {
    pub id: u64,
    pub name_locale_id: Option<u64>,
    pub description_locale_id: Option<u64>,
}

impl From<&RemoteEvent> for UpdateTarget {
    fn from(event: &RemoteEvent) -> Self {
        UpdateTarget {
            id: event.id,
            name_locale_id: event.name.id,
            description_locale_id: event.description.id,
        }
    }
}
