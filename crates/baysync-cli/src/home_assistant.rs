//! Home Assistant calendar as the local store.
//!
//! Queries go to the REST calendar endpoint with UTC bounds; creates go
//! through the `calendar.create_event` service with local timestamps in the
//! configured zone that carry their UTC offset, so Home Assistant never has to
//! guess which zone they are in.

use baysync_engine::{ExistingEvent, Store, SyncError, TimeWindow};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const QUERY_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const CREATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Connection settings for [`HomeAssistantStore`].
#[derive(Clone)]
pub struct HomeAssistantConfig {
    /// API base including `/api`, without a trailing slash.
    pub base_url: String,
    pub access_token: String,
    pub timezone: Tz,
}

pub struct HomeAssistantStore {
    client: Client,
    config: HomeAssistantConfig,
}

impl HomeAssistantStore {
    pub fn new(config: HomeAssistantConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("baysync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }
}

impl Store for HomeAssistantStore {
    fn query(&self, calendar_id: &str, window: &TimeWindow) -> Result<Vec<ExistingEvent>, SyncError> {
        let url = format!("{}/calendars/{}", self.config.base_url, calendar_id);
        let start = window.start.format(QUERY_FORMAT).to_string();
        let end = window.end.format(QUERY_FORMAT).to_string();
        debug!(%url, %start, %end, "querying Home Assistant calendar");

        let response = self
            .client
            .get(&url)
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .bearer_auth(&self.config.access_token)
            .send()
            .map_err(|e| SyncError::RemoteQuery(format!("Home Assistant request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SyncError::RemoteQuery(format!("Home Assistant response unreadable: {e}")))?;
        if !status.is_success() {
            return Err(SyncError::RemoteQuery(format!(
                "Home Assistant returned HTTP {status}: {body}"
            )));
        }

        decode_events(&body)
    }

    fn create(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: &str,
    ) -> Result<(), SyncError> {
        let url = format!("{}/services/calendar/create_event", self.config.base_url);
        let request = CreateEventRequest::new(calendar_id, start, end, label, self.config.timezone);
        let failure = |message: String| SyncError::CreateFailure {
            label: label.to_string(),
            message,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .map_err(|e| failure(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        debug!(%status, %body, "Home Assistant create_event response");
        if !status.is_success() {
            return Err(failure(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

/// Body of a `calendar.create_event` service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateEventRequest {
    pub entity_id: String,
    pub start_date_time: String,
    pub end_date_time: String,
    pub summary: String,
    pub description: String,
}

impl CreateEventRequest {
    pub fn new(calendar_id: &str, start: DateTime<Utc>, end: DateTime<Utc>, label: &str, tz: Tz) -> Self {
        Self {
            entity_id: calendar_id.to_string(),
            start_date_time: start.with_timezone(&tz).format(CREATE_FORMAT).to_string(),
            end_date_time: end.with_timezone(&tz).format(CREATE_FORMAT).to_string(),
            summary: label.to_string(),
            description: label.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    summary: String,
    start: RawTime,
    end: RawTime,
}

#[derive(Deserialize)]
struct RawTime {
    #[serde(rename = "dateTime")]
    date_time: Option<DateTime<FixedOffset>>,
}

/// Decode the calendar endpoint's event list.
///
/// All-day events carry only a `date` and are skipped: they are notes on the
/// day, not bookings that could contain a merged interval.
pub fn decode_events(body: &str) -> Result<Vec<ExistingEvent>, SyncError> {
    let raw: Vec<RawEvent> = serde_json::from_str(body)
        .map_err(|e| SyncError::RemoteQuery(format!("Malformed Home Assistant response: {e}")))?;

    raw.into_iter()
        .filter_map(|event| match (event.start.date_time, event.end.date_time) {
            (Some(start), Some(end)) => Some(
                ExistingEvent::new(start.with_timezone(&Utc), end.with_timezone(&Utc), event.summary)
                    .map_err(|e| SyncError::RemoteQuery(format!("Malformed Home Assistant event: {e}"))),
            ),
            _ => {
                debug!(summary = %event.summary, "skipping all-day event");
                None
            }
        })
        .collect()
}
