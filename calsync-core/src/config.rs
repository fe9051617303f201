//! Configuration for a sync run.
//!
//! Settings are layered: built-in defaults, then an optional TOML file at
//! `~/.config/calsync/config.toml` (or an explicit path), then `CALSYNC_*`
//! environment variables. Credentials for the remote API are read separately
//! from `TREY_USER` and `TREY_PASSWORD`.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{SyncError, SyncResult};

static DEFAULT_FEED_URL: &str = "https://api.lu.ma/ics/get?entity=calendar&id=cal-ixj8cqeAEnPgo9o";
static DEFAULT_API_URL: &str = "https://trey-calendar-strapi.fly.dev";

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_organizer_id() -> u64 {
    31
}

fn default_page_size() -> u32 {
    10
}

fn default_lookback_hours() -> i64 {
    24
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// iCalendar document to mirror.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Base URL of the remote API, without a trailing `/api`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Only remote events owned by this organizer are listed.
    #[serde(default = "default_organizer_id")]
    pub organizer_id: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Feed events that started more than this many hours ago are ignored.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            feed_url: default_feed_url(),
            api_url: default_api_url(),
            organizer_id: default_organizer_id(),
            page_size: default_page_size(),
            lookback_hours: default_lookback_hours(),
        }
    }
}

impl SyncConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("calsync").join("config.toml"))
    }

    /// Load the layered configuration. An explicit `path` must exist; the
    /// default path is optional.
    pub fn load(path: Option<&Path>) -> SyncResult<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(default_path) = Self::config_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder
            .add_source(Environment::with_prefix("CALSYNC").try_parsing(true))
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))
    }

    pub fn lookback(&self) -> Duration {
        Duration::hours(self.lookback_hours)
    }

    /// Base URL with any trailing slash removed, so paths can be appended.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Login credentials for the remote API.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Read `TREY_USER` and `TREY_PASSWORD` from the environment.
    pub fn from_env() -> SyncResult<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("TREY"))
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| {
                SyncError::Config(format!("TREY_USER and TREY_PASSWORD must be set ({e})"))
            })
    }
}
