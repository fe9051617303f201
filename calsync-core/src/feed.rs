//! Fetches the external calendar feed.

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::event::FeedEvent;
use crate::ics::parse_feed;

pub struct FeedReader {
    client: reqwest::Client,
    url: String,
    lookback: Duration,
}

impl FeedReader {
    pub fn new(client: reqwest::Client, config: &SyncConfig) -> Self {
        FeedReader {
            client,
            url: config.feed_url.clone(),
            lookback: config.lookback(),
        }
    }

    /// Download and parse the feed, keeping only events that start after
    /// `now - lookback`.
    #[instrument(skip(self), fields(url = %self.url), level = "info")]
    pub async fn fetch(&self, now: DateTime<Utc>) -> SyncResult<Vec<FeedEvent>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::Fetch(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let content = response
            .text()
            .await
            .map_err(|e| SyncError::Fetch(e.to_string()))?;

        let events = parse_feed(&content)?;
        let total = events.len();
        let upcoming = upcoming(events, now, self.lookback);

        tracing::debug!(total, kept = upcoming.len(), "Parsed calendar feed");

        Ok(upcoming)
    }
}

/// Keep events starting strictly after `now - lookback`.
pub fn upcoming(events: Vec<FeedEvent>, now: DateTime<Utc>, lookback: Duration) -> Vec<FeedEvent> {
    let cutoff = now - lookback;
    events.into_iter().filter(|e| e.start > cutoff).collect()
}
