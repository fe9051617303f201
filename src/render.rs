//! TUI rendering traits for calsync types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to calsync-core types using owo_colors.

use calsync_core::diff::{DiffKind, EventUpdate, FieldChange, SyncPlan, SyncStats};
use calsync_core::{FeedEvent, RemoteEvent};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            DiffKind::Create => symbol.green().to_string(),
            DiffKind::Update => symbol.yellow().to_string(),
            DiffKind::Delete => symbol.red().to_string(),
        }
    }
}

/// Colorize text according to the diff kind
fn colorize_diff(kind: DiffKind, text: &str) -> String {
    match kind {
        DiffKind::Create => text.green().to_string(),
        DiffKind::Update => text.yellow().to_string(),
        DiffKind::Delete => text.red().to_string(),
    }
}

fn render_time(start: &DateTime<Utc>) -> String {
    start.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn render_line(kind: DiffKind, label: &str, start: &DateTime<Utc>) -> String {
    format!(
        "{} {} {}",
        kind.render(),
        colorize_diff(kind, label),
        render_time(start).dimmed()
    )
}

impl Render for FeedEvent {
    fn render(&self) -> String {
        render_line(DiffKind::Create, &self.title, &self.start)
    }
}

impl Render for EventUpdate {
    fn render(&self) -> String {
        let label = format!("{} (id {})", self.event.title, self.target.id);
        render_line(DiffKind::Update, &label, &self.event.start)
    }
}

impl Render for RemoteEvent {
    fn render(&self) -> String {
        render_line(DiffKind::Delete, &self.to_string(), &self.start)
    }
}

impl Render for FieldChange {
    fn render(&self) -> String {
        format!(
            "{}: {} → {}",
            self.field.to_string().dimmed(),
            shorten(&self.old).red(),
            shorten(&self.new).green()
        )
    }
}

impl Render for SyncStats {
    fn render(&self) -> String {
        format!("Synced: {}", self)
    }
}

/// First line of a value, cut to a width that fits a terminal row.
fn shorten(value: &str) -> String {
    const MAX_CHARS: usize = 60;

    if value.is_empty() {
        return "(empty)".to_string();
    }

    let first_line = value.lines().next().unwrap_or_default();
    let truncated = first_line.chars().count() > MAX_CHARS || value.lines().nth(1).is_some();

    if truncated {
        let head: String = first_line.chars().take(MAX_CHARS).collect();
        format!("{}…", head)
    } else {
        first_line.to_string()
    }
}

/// Threshold for compact view (show counts instead of individual events)
const COMPACT_THRESHOLD: usize = 5;

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn render_count(kind: DiffKind, count: usize, adjective: &str) -> Option<String> {
    if count == 0 {
        return None;
    }

    let label = format!("({} {} {})", count, adjective, pluralize("event", count));
    Some(format!("   {} {}", kind.render(), colorize_diff(kind, &label)))
}

/// Rendering of a whole sync plan
pub trait PlanRender {
    fn render_plan(&self, verbose: bool) -> String;
}

impl PlanRender for SyncPlan {
    fn render_plan(&self, verbose: bool) -> String {
        if self.is_empty() {
            return "   No changes".dimmed().to_string();
        }

        let mut lines = Vec::new();

        if verbose || self.len() <= COMPACT_THRESHOLD {
            // Full view: show each event
            for event in &self.to_create {
                lines.push(format!("   {}", event.render()));
            }
            for update in &self.to_update {
                lines.push(format!("   {}", update.render()));
                lines.extend(
                    update
                        .changes
                        .iter()
                        .map(|change| format!("      {}", change.render())),
                );
            }
            for event in &self.to_delete {
                lines.push(format!("   {}", event.render()));
            }
        } else {
            // Compact view: show counts by diff kind
            lines.extend(render_count(DiffKind::Create, self.to_create.len(), "new"));
            lines.extend(render_count(DiffKind::Update, self.to_update.len(), "changed"));
            lines.extend(render_count(DiffKind::Delete, self.to_delete.len(), "removed"));
        }

        lines.join("\n")
    }
}
