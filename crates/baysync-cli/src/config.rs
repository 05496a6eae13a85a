//! YAML configuration for a sync run.
//!
//! ```yaml
//! google_credentials_path: /etc/baysync/google-token.json
//! google_calendar_id: primary        # optional
//! ha_url: http://homeassistant.local:8123/api
//! ha_access_token: "eyJhbGciOi..."
//! timezone: America/Chicago          # optional, defaults to the system zone
//! resource_marker: Bay               # optional
//! merge_gap_minutes: 5               # optional, defaults to 0
//! require_label_match: false         # optional
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use baysync_engine::tag::DEFAULT_MARKER;
use baysync_engine::{MatchPolicy, MergeOptions, SyncOptions, TagExtractor};
use chrono::Duration;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::google::{GoogleFeedConfig, DEFAULT_API_URL};
use crate::home_assistant::HomeAssistantConfig;

fn default_google_calendar_id() -> String {
    "primary".to_string()
}

fn default_google_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_resource_marker() -> String {
    DEFAULT_MARKER.to_string()
}

#[derive(Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON file holding a Google OAuth access token.
    pub google_credentials_path: PathBuf,

    #[serde(default = "default_google_calendar_id")]
    pub google_calendar_id: String,

    #[serde(default = "default_google_api_url")]
    pub google_api_url: String,

    /// Home Assistant API base, e.g. `http://host:8123/api`.
    pub ha_url: String,

    pub ha_access_token: String,

    /// IANA zone for the end of the sync day and for create timestamps.
    pub timezone: Option<String>,

    #[serde(default = "default_resource_marker")]
    pub resource_marker: String,

    #[serde(default)]
    pub merge_gap_minutes: u32,

    #[serde(default)]
    pub require_label_match: bool,
}

// Tokens stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("google_credentials_path", &self.google_credentials_path)
            .field("google_calendar_id", &self.google_calendar_id)
            .field("google_api_url", &self.google_api_url)
            .field("ha_url", &self.ha_url)
            .field("ha_access_token", &"<redacted>")
            .field("timezone", &self.timezone)
            .field("resource_marker", &self.resource_marker)
            .field("merge_gap_minutes", &self.merge_gap_minutes)
            .field("require_label_match", &self.require_label_match)
            .finish()
    }
}

impl Config {
    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(?config, "loaded config");
        Ok(config)
    }

    /// Parse and validate YAML config text.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(raw).context("Failed to parse YAML")?;
        config.ha_access_token = config.ha_access_token.trim().to_string();
        config.ha_url = config.ha_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.ha_access_token.is_empty() {
            bail!("ha_access_token must not be empty");
        }
        if self.ha_url.is_empty() {
            bail!("ha_url must not be empty");
        }
        if self.resource_marker.trim().is_empty() {
            bail!("resource_marker must not be empty");
        }
        TagExtractor::new(self.resource_marker.trim()).context("resource_marker is not usable")?;
        self.timezone()?;
        Ok(())
    }

    /// The configured zone, else the system zone, else UTC.
    pub fn timezone(&self) -> Result<Tz> {
        match &self.timezone {
            Some(name) => name
                .parse()
                .map_err(|_| anyhow::anyhow!("Unknown timezone: '{}'", name)),
            None => Ok(iana_time_zone::get_timezone()
                .ok()
                .and_then(|name| name.parse().ok())
                .unwrap_or(Tz::UTC)),
        }
    }

    /// Read the Google access token from `google_credentials_path`.
    ///
    /// Accepts a JSON object carrying the token under `token` (authorized-user
    /// files) or `access_token` (raw OAuth responses).
    pub fn google_access_token(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct TokenFile {
            token: Option<String>,
            access_token: Option<String>,
        }

        let path = &self.google_credentials_path;
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Google credentials: {}", path.display()))?;
        let file: TokenFile = serde_json::from_str(&raw)
            .with_context(|| format!("Google credentials are not valid JSON: {}", path.display()))?;

        match file.token.or(file.access_token) {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => bail!(
                "No access token ('token' or 'access_token') in {}",
                path.display()
            ),
        }
    }

    pub fn google(&self, access_token: String) -> GoogleFeedConfig {
        GoogleFeedConfig {
            api_url: self.google_api_url.clone(),
            calendar_id: self.google_calendar_id.clone(),
            access_token,
        }
    }

    pub fn home_assistant(&self) -> Result<HomeAssistantConfig> {
        Ok(HomeAssistantConfig {
            base_url: self.ha_url.clone(),
            access_token: self.ha_access_token.clone(),
            timezone: self.timezone()?,
        })
    }

    /// Engine settings for syncing `resource` into `calendar_id`.
    pub fn sync_options(
        &self,
        resource: &str,
        calendar_id: &str,
        dry_run: bool,
    ) -> Result<SyncOptions> {
        let match_policy = if self.require_label_match {
            MatchPolicy::ContainmentAndLabel
        } else {
            MatchPolicy::Containment
        };

        Ok(SyncOptions {
            extractor: TagExtractor::new(self.resource_marker.trim())?,
            merge: MergeOptions {
                gap_tolerance: Duration::minutes(i64::from(self.merge_gap_minutes)),
            },
            match_policy,
            dry_run,
            ..SyncOptions::new(resource, calendar_id)?
        })
    }
}
