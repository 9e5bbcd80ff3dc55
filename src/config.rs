use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use api::request::TimelineQuery;
use cli::CommandTemplate;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub player: Player,
    #[serde(default)]
    pub timeline: Timeline,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Request timeout in seconds, 0 disables it
    #[serde(default = "default_api_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Session {
    #[serde(default = "default_session_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Player {
    #[serde(default = "default_player_command")]
    pub command: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Timeline {
    #[serde(default = "default_timeline_start")]
    pub start: DateTime<Utc>,
    #[serde(default = "default_timeline_hours")]
    pub hours: u32,
}

fn default_api_url() -> String {
    env::var("CAMDECK_API_URL").unwrap_or(String::from("http://127.0.0.1:8000/api"))
}

fn default_api_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    })
}

fn default_session_path() -> String {
    String::from("camdeck-session.json")
}

fn default_player_command() -> String {
    String::from("ffplay -loglevel error -ss {offset} {url}")
}

fn default_timeline_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 8, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn default_timeline_hours() -> u32 {
    24
}

impl Default for Api {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout: default_api_timeout(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            command: default_player_command(),
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            start: default_timeline_start(),
            hours: default_timeline_hours(),
        }
    }
}

impl Api {
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Timeline {
    pub fn query(&self) -> TimelineQuery {
        TimelineQuery::window(self.start, self.hours)
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.api.url.trim().is_empty() {
            return Err(anyhow!("api.url cannot be empty"));
        }
        if self.timeline.hours == 0 {
            return Err(anyhow!("timeline.hours must be greater than 0"));
        }
        CommandTemplate::parse(&self.player.command)?;
        Ok(())
    }
}
