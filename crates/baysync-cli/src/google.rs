//! Google Calendar as the booking feed.
//!
//! Reads `events.list` with `singleEvents=true&orderBy=startTime`, so recurring
//! bookings arrive already expanded and in start order. Authentication is a
//! bearer access token obtained elsewhere; it is never refreshed here.

use std::collections::HashSet;

use baysync_engine::{Feed, SourceEvent, SyncError, TimeWindow};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Connection settings for [`GoogleCalendarFeed`].
#[derive(Clone)]
pub struct GoogleFeedConfig {
    pub api_url: String,
    pub calendar_id: String,
    pub access_token: String,
}

pub struct GoogleCalendarFeed {
    client: Client,
    config: GoogleFeedConfig,
}

impl GoogleCalendarFeed {
    pub fn new(config: GoogleFeedConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("baysync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    fn events_url(&self, window: &TimeWindow, page_token: Option<&str>) -> Result<Url, SyncError> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| SyncError::RemoteQuery(format!("Bad Google API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::RemoteQuery("Google API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["calendars", self.config.calendar_id.as_str(), "events"]);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("timeMin", &rfc3339(window.start))
                .append_pair("timeMax", &rfc3339(window.end))
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime");
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        Ok(url)
    }
}

impl Feed for GoogleCalendarFeed {
    fn fetch(&self, window: &TimeWindow) -> Result<Vec<SourceEvent>, SyncError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let url = self.events_url(window, page_token.as_deref())?;
            debug!(%url, "fetching Google Calendar events");

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.config.access_token)
                .send()
                .map_err(|e| SyncError::RemoteQuery(format!("Google Calendar request failed: {e}")))?;

            let status = response.status();
            let body = response
                .text()
                .map_err(|e| SyncError::RemoteQuery(format!("Google Calendar response unreadable: {e}")))?;
            if !status.is_success() {
                return Err(SyncError::RemoteQuery(format!(
                    "Google Calendar returned HTTP {status}: {body}"
                )));
            }

            let page = decode_page(&body)?;
            events.extend(page.events);
            match page.next_page_token {
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(SyncError::RemoteQuery(format!(
                            "Google Calendar repeated page token {token:?}"
                        )));
                    }
                    page_token = Some(token);
                }
                None => break,
            }
        }

        debug!(count = events.len(), "fetched Google Calendar events");
        Ok(events)
    }
}

/// One decoded page of `events.list`.
#[derive(Debug)]
pub struct EventsPage {
    pub events: Vec<SourceEvent>,
    pub next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    #[serde(default)]
    items: Vec<RawEvent>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    location: String,
    start: RawTime,
    end: RawTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTime {
    date_time: Option<DateTime<FixedOffset>>,
}

/// Decode an `events.list` response body.
///
/// All-day items (no `dateTime`) and cancelled items are skipped. A missing
/// location decodes as empty so it fails tag extraction instead of vanishing.
pub fn decode_page(body: &str) -> Result<EventsPage, SyncError> {
    let raw: RawPage = serde_json::from_str(body)
        .map_err(|e| SyncError::RemoteQuery(format!("Malformed Google Calendar response: {e}")))?;

    let mut events = Vec::with_capacity(raw.items.len());
    for item in raw.items {
        if item.status.as_deref() == Some("cancelled") {
            continue;
        }
        let (Some(start), Some(end)) = (item.start.date_time, item.end.date_time) else {
            debug!(summary = %item.summary, "skipping all-day event");
            continue;
        };
        let event = SourceEvent::new(
            start.with_timezone(&Utc),
            end.with_timezone(&Utc),
            item.summary,
            item.location,
        )
        .map_err(|e| SyncError::RemoteQuery(format!("Malformed Google Calendar event: {e}")))?;
        events.push(event);
    }

    Ok(EventsPage {
        events,
        next_page_token: raw.next_page_token,
    })
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
