//! Runs one synchronization pass: read, reconcile, write.

use chrono::{DateTime, Utc};

use crate::config::{Credentials, SyncConfig};
use crate::diff::{SyncPlan, SyncStats, reconcile};
use crate::error::SyncResult;
use crate::feed::FeedReader;
use crate::remote::EventStore;
use crate::session::Session;

pub struct Syncer {
    feed: FeedReader,
    store: EventStore,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct SyncReport {
    pub plan: SyncPlan,
    pub stats: SyncStats,
}

impl Syncer {
    pub fn new(feed: FeedReader, store: EventStore) -> Self {
        Syncer { feed, store }
    }

    /// Wire up the feed reader, session and store from configuration,
    /// sharing one HTTP client.
    pub fn from_config(config: &SyncConfig, credentials: Credentials) -> Self {
        let client = reqwest::Client::new();
        let session = Session::new(client.clone(), config.api_base(), credentials);
        let feed = FeedReader::new(client.clone(), config);
        let store = EventStore::new(client, config, session);

        Syncer::new(feed, store)
    }

    /// Read both sides and compute the writes, without applying them.
    pub async fn plan(&self, now: DateTime<Utc>) -> SyncResult<SyncPlan> {
        let feed_events = self.feed.fetch(now).await?;
        let remote_events = self.store.list().await?;

        tracing::info!(
            feed = feed_events.len(),
            remote = remote_events.len(),
            "Loaded events"
        );

        let plan = reconcile(&feed_events, &remote_events);

        for description in &plan.duplicate_descriptions {
            tracing::warn!(
                description = %description,
                "Several events share this description; matching uses the first remote event"
            );
        }

        Ok(plan)
    }

    /// Apply creates, then updates, then deletes, one call at a time.
    ///
    /// Stops at the first failed call. Writes issued before the failure are
    /// not rolled back.
    pub async fn apply(&self, plan: &SyncPlan) -> SyncResult<SyncStats> {
        let mut stats = SyncStats::default();

        for event in &plan.to_create {
            self.store.create(event).await?;
            stats.created += 1;
        }

        for update in &plan.to_update {
            self.store.update(&update.target, &update.event).await?;
            stats.updated += 1;
        }

        for event in &plan.to_delete {
            self.store.delete(event.id).await?;
            stats.deleted += 1;
        }

        Ok(stats)
    }

    pub async fn run(&self, now: DateTime<Utc>) -> SyncResult<SyncReport> {
        let plan = self.plan(now).await?;
        let stats = self.apply(&plan).await?;

        tracing::info!(%stats, "Sync finished");

        Ok(SyncReport { plan, stats })
    }
}
