//! HTTP client configuration for media downloads.

use thiserror::Error;

use super::constants::{CONNECT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use crate::user_agent;

/// Invalid client configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A timeout is outside `1..=3600` seconds.
    #[error("invalid value for `{field}`: {value}. Expected range: 1..=3600")]
    TimeoutOutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// The User-Agent is empty or not a valid header value.
    #[error("invalid user agent: {0:?}")]
    InvalidUserAgent(String),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Settings for [`MediaClient`](super::MediaClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds for each read; a transfer that keeps
    /// receiving bytes is never cut off.
    pub read_timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            user_agent: user_agent::default_download_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Overrides both timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }

    /// Overrides the User-Agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates values against the accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if self.user_agent.trim().is_empty()
            || reqwest::header::HeaderValue::from_str(&self.user_agent).is_err()
        {
            return Err(ConfigError::InvalidUserAgent(self.user_agent.clone()));
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if (1..=MAX_TIMEOUT_SECS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::TimeoutOutOfRange { field, value })
    }
}
