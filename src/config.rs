//! Startup configuration.
//!
//! Settings come from an optional TOML file, then `SPARK_FOLIO_*`
//! environment variables, which win. Relay credentials are checked here so a
//! missing key stops the program at launch instead of at the first submit.
//!
//! ```toml
//! [relay]
//! endpoint = "https://api.emailjs.com/api/v1.0/email/send"
//! service_id = "service_abc"
//! template_id = "template_xyz"
//! public_key = "pk_123"
//! timeout_secs = 15
//!
//! [page]
//! header_condense_at = 8
//! scroll_step = 1
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::state::scroll::{HEADER_CONDENSE_AT, LINE_SCROLL};

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENV_ENDPOINT: &str = "SPARK_FOLIO_RELAY_ENDPOINT";
pub const ENV_SERVICE_ID: &str = "SPARK_FOLIO_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "SPARK_FOLIO_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "SPARK_FOLIO_PUBLIC_KEY";
pub const ENV_TIMEOUT_SECS: &str = "SPARK_FOLIO_RELAY_TIMEOUT_SECS";
pub const ENV_HEADER_CONDENSE_AT: &str = "SPARK_FOLIO_HEADER_CONDENSE_AT";
pub const ENV_SCROLL_STEP: &str = "SPARK_FOLIO_SCROLL_STEP";

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig {
    /// None when running offline.
    pub relay: Option<RelayConfig>,
    pub page: PageConfig,
}

/// Mail relay endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub endpoint: Url,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    /// Header condenses once scrolled past this row.
    pub header_condense_at: u32,
    /// Multiplier for line and wheel scrolling.
    pub scroll_step: i32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_condense_at: HEADER_CONDENSE_AT,
            scroll_step: LINE_SCROLL,
        }
    }
}

// =============================================================================
// FILE SOURCE
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    relay: FileRelay,
    page: FilePage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileRelay {
    endpoint: Option<String>,
    service_id: Option<String>,
    template_id: Option<String>,
    public_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FilePage {
    header_condense_at: Option<u32>,
    scroll_step: Option<i32>,
}

// =============================================================================
// LOADING
// =============================================================================

impl FolioConfig {
    /// Load from `path` (if given) and the process environment.
    ///
    /// `offline` skips the relay entirely, so no credentials are required.
    pub fn load(path: Option<&Path>, offline: bool) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok(), offline)
    }

    /// Load from `path` (if given) with `lookup` standing in for the
    /// environment.
    pub fn load_with<F>(path: Option<&Path>, lookup: F, offline: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => FileConfig::default(),
        };

        Self::compose(file, lookup, offline)
    }

    /// Parse `contents` as a config file and layer `lookup` over it.
    pub fn from_toml<F>(contents: &str, lookup: F, offline: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        Self::compose(file, lookup, offline)
    }

    fn compose<F>(file: FileConfig, lookup: F, offline: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page = PageConfig {
            header_condense_at: parse_env(&lookup, ENV_HEADER_CONDENSE_AT)?
                .or(file.page.header_condense_at)
                .unwrap_or(HEADER_CONDENSE_AT),
            scroll_step: parse_env(&lookup, ENV_SCROLL_STEP)?
                .or(file.page.scroll_step)
                .unwrap_or(LINE_SCROLL),
        };
        if page.scroll_step <= 0 {
            return Err(ConfigError::Invalid {
                key: "page.scroll_step",
                reason: "must be at least 1".into(),
            });
        }

        let relay = if offline {
            None
        } else {
            Some(RelayConfig::compose(&file.relay, &lookup)?)
        };

        Ok(Self { relay, page })
    }
}

impl RelayConfig {
    /// Relay settings from environment-style lookups only.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::compose(&FileRelay::default(), &lookup)
    }

    fn compose<F>(file: &FileRelay, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |env: &str, from_file: &Option<String>| {
            lookup(env)
                .or_else(|| from_file.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let endpoint_raw =
            pick(ENV_ENDPOINT, &file.endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.into());
        let endpoint = parse_endpoint(&endpoint_raw)?;

        let service_id = pick(ENV_SERVICE_ID, &file.service_id)
            .ok_or(ConfigError::Missing("relay.service_id"))?;
        let template_id = pick(ENV_TEMPLATE_ID, &file.template_id)
            .ok_or(ConfigError::Missing("relay.template_id"))?;
        let public_key = pick(ENV_PUBLIC_KEY, &file.public_key)
            .ok_or(ConfigError::Missing("relay.public_key"))?;

        let timeout = match parse_env::<u64, _>(lookup, ENV_TIMEOUT_SECS)?.or(file.timeout_secs) {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "relay.timeout_secs",
                    reason: "must be at least 1".into(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            service_id,
            template_id,
            public_key,
            timeout,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::InvalidEndpoint(raw.to_string())),
    }
}

fn parse_env<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|err: T::Err| ConfigError::Invalid {
                key,
                reason: err.to_string(),
            }),
    }
}
