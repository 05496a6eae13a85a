//! # baysync-cli
//!
//! The I/O side of baysync: YAML configuration, the Google Calendar feed, the
//! Home Assistant calendar store, and report rendering. The `baysync` binary
//! wires these into a [`baysync_engine::Syncer`] run.
//!
//! ## Modules
//!
//! - [`config`] — YAML config file → collaborator settings and sync options
//! - [`google`] — Google Calendar `events.list` feed
//! - [`home_assistant`] — Home Assistant calendar query and `create_event`
//! - [`report`] — text rendering of a sync report

pub mod config;
pub mod google;
pub mod home_assistant;
pub mod report;

pub use config::Config;
pub use google::{GoogleCalendarFeed, GoogleFeedConfig};
pub use home_assistant::{HomeAssistantConfig, HomeAssistantStore};
