//! Client for the remote events resource.

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use tracing::instrument;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::event::{FeedEvent, RemoteEvent, UpdateTarget};
use crate::remote::protocol::{EventPage, EventWrite};
use crate::session::Session;

/// Events belonging to one organizer in the remote store.
pub struct EventStore {
    client: reqwest::Client,
    base_url: String,
    session: Session,
    organizer_id: u64,
    page_size: u32,
}

impl EventStore {
    pub fn new(client: reqwest::Client, config: &SyncConfig, session: Session) -> Self {
        EventStore {
            client,
            base_url: config.api_base().to_string(),
            session,
            organizer_id: config.organizer_id,
            page_size: config.page_size,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn events_url(&self) -> String {
        format!("{}/api/events", self.base_url)
    }

    fn event_url(&self, id: u64) -> String {
        format!("{}/api/events/{}", self.base_url, id)
    }

    fn list_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("fields", "from".to_string()),
            ("fields", "to".to_string()),
            ("fields", "location".to_string()),
            ("populate[name]", "true".to_string()),
            ("populate[description]", "true".to_string()),
            ("populate[organizer][fields]", "id".to_string()),
            ("filters[organizer][id][$eq]", self.organizer_id.to_string()),
            ("sort", "from:desc".to_string()),
            ("pagination[page]", page.to_string()),
            ("pagination[pageSize]", self.page_size.to_string()),
        ]
    }

    /// All events of the organizer, newest first, fetched page by page until
    /// the reported page count is reached.
    #[instrument(skip(self), fields(organizer_id = self.organizer_id), level = "info")]
    pub async fn list(&self) -> SyncResult<Vec<RemoteEvent>> {
        let mut events = Vec::new();
        let mut page = 1;

        loop {
            let result = self.list_page(page).await?;
            let page_count = result.meta.pagination.page_count;

            tracing::debug!(page, page_count, records = result.data.len(), "Fetched events page");
            events.extend(result.data.into_iter().map(RemoteEvent::from));

            if page_count > page {
                page += 1;
            } else {
                break;
            }
        }

        Ok(events)
    }

    async fn list_page(&self, page: u32) -> SyncResult<EventPage> {
        let auth = self.session.authorization_header().await?;

        let response = self
            .client
            .get(self.events_url())
            .header(AUTHORIZATION, auth)
            .query(&self.list_query(page))
            .send()
            .await
            .map_err(|e| SyncError::RemoteRead(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SyncError::RemoteRead(format!(
                "page {} returned {}: {}",
                page, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SyncError::RemoteRead(format!("Invalid events page {}: {}", page, e)))
    }

    #[instrument(skip(self, event), fields(title = %event.title), level = "info")]
    pub async fn create(&self, event: &FeedEvent) -> SyncResult<()> {
        let action = format!("create event \"{}\"", event.title);
        let auth = self.session.authorization_header().await?;

        let response = self
            .client
            .post(self.events_url())
            .header(AUTHORIZATION, auth)
            .json(&EventWrite::new(event, None, None))
            .send()
            .await
            .map_err(|e| SyncError::remote_write(action.clone(), e))?;

        expect_ok(response, action).await?;
        tracing::info!("Created event \"{}\"", event.title);

        Ok(())
    }

    #[instrument(skip(self, event), fields(id = target.id, title = %event.title), level = "info")]
    pub async fn update(&self, target: &UpdateTarget, event: &FeedEvent) -> SyncResult<()> {
        let action = format!("edit event id {}", target.id);
        let auth = self.session.authorization_header().await?;

        let body = EventWrite::new(event, target.name_locale_id, target.description_locale_id);

        let response = self
            .client
            .put(self.event_url(target.id))
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::remote_write(action.clone(), e))?;

        expect_ok(response, action).await?;
        tracing::info!("Edited event \"{}\" with id {}", event.title, target.id);

        Ok(())
    }

    #[instrument(skip(self), level = "info")]
    pub async fn delete(&self, id: u64) -> SyncResult<()> {
        let action = format!("delete event id {}", id);
        let auth = self.session.authorization_header().await?;

        let response = self
            .client
            .delete(self.event_url(id))
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| SyncError::remote_write(action.clone(), e))?;

        expect_ok(response, action).await?;
        tracing::info!("Deleted event id {}", id);

        Ok(())
    }
}

/// Writes only count as successful on a plain 200.
async fn expect_ok(response: reqwest::Response, action: String) -> SyncResult<()> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(SyncError::RemoteWrite {
        action,
        status: status.to_string(),
        body,
    })
}
