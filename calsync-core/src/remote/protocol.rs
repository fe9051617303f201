//! Wire format of the remote events API.
//!
//! Responses wrap each record as `{id, attributes}` and every list response
//! carries `meta.pagination`. Translatable fields are components with one
//! column per locale.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{FeedEvent, LocalizedText, RemoteEvent};

#[derive(Debug, Deserialize)]
pub struct EventPage {
    pub data: Vec<EventEntry>,
    pub meta: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct EventEntry {
    pub id: u64,
    pub attributes: EventAttributes,
}

#[derive(Debug, Deserialize)]
pub struct EventAttributes {
    pub from: DateTime<Utc>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizedField>,
    #[serde(default)]
    pub description: Option<LocalizedField>,
    #[serde(default)]
    pub organizer: Option<Relation>,
}

#[derive(Debug, Deserialize)]
pub struct LocalizedField {
    pub id: Option<u64>,
    #[serde(default)]
    pub fi: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Relation {
    pub data: Option<RelationData>,
}

#[derive(Debug, Deserialize)]
pub struct RelationData {
    pub id: u64,
}

impl From<LocalizedField> for LocalizedText {
    fn from(field: LocalizedField) -> Self {
        LocalizedText {
            id: field.id,
            fi: field.fi.unwrap_or_default(),
            en: field.en.unwrap_or_default(),
        }
    }
}

impl From<EventEntry> for RemoteEvent {
    fn from(entry: EventEntry) -> Self {
        let attrs = entry.attributes;

        RemoteEvent {
            id: entry.id,
            name: attrs.name.map(LocalizedText::from).unwrap_or_default(),
            start: attrs.from,
            end: attrs.to,
            location: attrs.location.unwrap_or_default(),
            description: attrs.description.map(LocalizedText::from).unwrap_or_default(),
            organizer_id: attrs.organizer.and_then(|o| o.data).map(|d| d.id),
        }
    }
}

/// Body for create (`POST`) and update (`PUT`) calls.
#[derive(Debug, Serialize)]
pub struct EventWrite<'a> {
    pub data: EventData<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData<'a> {
    pub name: LocalizedWrite<'a>,
    pub from: String,
    pub to: String,
    pub location: &'a str,
    pub description: LocalizedWrite<'a>,
    pub category: Option<u64>,
    pub is_open: bool,
    pub image: Option<u64>,
}

/// The feed is monolingual, so every locale gets the same text.
#[derive(Debug, Serialize)]
pub struct LocalizedWrite<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub fi: &'a str,
    pub en: &'a str,
}

impl<'a> LocalizedWrite<'a> {
    fn new(id: Option<u64>, text: &'a str) -> Self {
        LocalizedWrite { id, fi: text, en: text }
    }
}

impl<'a> EventWrite<'a> {
    /// Build a write body; pass the existing localized-record ids on update so
    /// the translations are edited in place instead of recreated.
    pub fn new(
        event: &'a FeedEvent,
        name_locale_id: Option<u64>,
        description_locale_id: Option<u64>,
    ) -> Self {
        EventWrite {
            data: EventData {
                name: LocalizedWrite::new(name_locale_id, &event.title),
                from: format_instant(&event.start),
                to: format_instant(&event.end),
                location: &event.location,
                description: LocalizedWrite::new(description_locale_id, &event.description),
                category: None,
                is_open: true,
                image: None,
            },
        }
    }
}

/// `2025-03-20T15:00:00.000Z`
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
