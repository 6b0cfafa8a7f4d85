//! Error types.
//!
//! Configuration errors surface at startup. Relay and validation errors are
//! recovered by the contact client into an actionable `Failed` state, so
//! nothing here is fatal once the page is mounted.

use std::path::PathBuf;

use crate::contact::ContactField;

/// Startup configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("relay endpoint `{0}` is not an http(s) url")]
    InvalidEndpoint(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Outbound relay failures.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("relay request timed out")]
    Timeout,

    #[error("relay rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

/// Browser-style required-field validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(ContactField),

    #[error("email address is not valid")]
    InvalidEmail,
}

/// Why a submit did not reach the `Sent` state.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a message is already being sent")]
    AlreadySending,

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Top-level error for the binary and for mounting a page.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("contact relay unavailable: {0}")]
    Relay(#[from] RelayError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FolioError> = std::result::Result<T, E>;
