//! Google Calendar provider implementation

use async_trait::async_trait;
use calsync_core::RemoteCalendarProvider;
use calsync_domain::{
    CalSyncError, Credential, EventDraft, ProviderConfig, RemoteEvent, Result, SyncWindow,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::http::HttpClient;

/// Upper bound on pages followed for one listing.
const MAX_PAGES: usize = 100;

/// Google Calendar provider over a single calendar.
///
/// Built around an injected [`HttpClient`]; the base URL is configurable so
/// tests can point it at a local mock server.
pub struct GoogleCalendarProvider {
    http: HttpClient,
    base_url: Url,
    calendar_id: String,
    page_size: u32,
}

impl GoogleCalendarProvider {
    /// Provider for `calendar_id` under `base_url`, which must be able to carry a path.
    pub fn new(http: HttpClient, base_url: &str, calendar_id: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            CalSyncError::Config(format!("invalid provider base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CalSyncError::Config(format!(
                "provider base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            http,
            base_url,
            calendar_id: calendar_id.into(),
            page_size: calsync_domain::constants::DEFAULT_PAGE_SIZE,
        })
    }

    /// Provider wired from the `provider` configuration section.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let http = HttpClient::from_config(config)?;
        Ok(Self::new(http, &config.base_url, config.calendar_id.clone())?
            .with_page_size(config.page_size))
    }

    /// Events requested per page, at least one.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// `{base}/calendars/{calendar_id}/events`, with the calendar id escaped.
    fn events_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CalSyncError::Config("provider base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    async fn fetch_page(
        &self,
        credential: &Credential,
        window: &SyncWindow,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let mut query = vec![
            ("timeMin", rfc3339(window.from())),
            ("timeMax", rfc3339(window.to())),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", self.page_size.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let request = self
            .http
            .request(Method::GET, self.events_url()?)
            .bearer_auth(credential.access_token())
            .query(&query);

        self.http.send_json(request, "list Google events").await
    }
}

#[async_trait]
impl RemoteCalendarProvider for GoogleCalendarProvider {
    #[instrument(skip(self, credential), fields(calendar_id = %self.calendar_id))]
    async fn fetch_events(
        &self,
        credential: &Credential,
        window: &SyncWindow,
    ) -> Result<Vec<RemoteEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let page = self.fetch_page(credential, window, page_token.as_deref()).await?;
            debug!(page_number, items = page.items.len(), "fetched Google events page");
            events.extend(page.items);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    warn!(page_number, "Google repeated a page token; stopping pagination");
                    return Ok(events);
                }
                Some(next) => page_token = Some(next),
                None => return Ok(events),
            }
        }

        Err(CalSyncError::RemoteUnavailable(format!(
            "Google listing did not finish within {MAX_PAGES} pages"
        )))
    }

    #[instrument(skip(self, credential, draft), fields(calendar_id = %self.calendar_id))]
    async fn create_event(&self, credential: &Credential, draft: &EventDraft) -> Result<RemoteEvent> {
        let body = InsertEventBody {
            summary: &draft.title,
            description: draft.description.as_deref(),
            start: InsertEventTime { date_time: rfc3339(draft.start_time) },
            end: InsertEventTime { date_time: rfc3339(draft.end_time) },
        };

        let request = self
            .http
            .request(Method::POST, self.events_url()?)
            .bearer_auth(credential.access_token())
            .json(&body);

        let created: RemoteEvent = self.http.send_json(request, "insert Google event").await?;

        if created.id.trim().is_empty() {
            return Err(CalSyncError::Internal("Google insert response carried no event id".into()));
        }

        debug!(external_id = %created.id, "created Google event");
        Ok(created)
    }
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<RemoteEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct InsertEventBody<'a> {
    summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    start: InsertEventTime,
    end: InsertEventTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventTime {
    date_time: String,
}
