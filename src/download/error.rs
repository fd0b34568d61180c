//! Error types for the download module.
//!
//! Every terminal outcome other than success is a `DownloadError`. Rejection of
//! non-media content and user-requested cancellation are expected, reportable
//! outcomes; [`DownloadError::kind`] separates them from real transport failures.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a failed download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The resource is not acceptable media content.
    RejectedMimetype,
    /// The caller requested a stop through the progress handle.
    Cancelled,
    /// Network, HTTP or file system failure.
    Transport,
}

impl FailureKind {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RejectedMimetype => "rejected_mimetype",
            Self::Cancelled => "cancelled",
            Self::Transport => "transport",
        }
    }
}

/// Errors that can occur during a media download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The response content-type is absent, not media, or has no known extension.
    #[error("not a media resource at {url} (content-type: {})", display_content_type(.content_type))]
    RejectedMimetype {
        /// The requested URL.
        url: String,
        /// The raw content-type header, if the server sent one.
        content_type: Option<String>,
    },

    /// The caller requested a stop before the transfer completed.
    #[error("download of {url} cancelled")]
    Cancelled {
        /// The URL whose transfer was stopped.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, reset mid-body, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error (creating directories, opening, writing, flushing).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a mimetype rejection error.
    pub fn rejected_mimetype(url: impl Into<String>, content_type: Option<String>) -> Self {
        Self::RejectedMimetype {
            url: url.into(),
            content_type,
        }
    }

    /// Creates a cancellation error.
    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::Cancelled { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    ///
    /// Timeouts are promoted to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Maps this error onto the three terminal failure outcomes.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RejectedMimetype { .. } => FailureKind::RejectedMimetype,
            Self::Cancelled { .. } => FailureKind::Cancelled,
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::Io { .. }
            | Self::InvalidUrl { .. } => FailureKind::Transport,
        }
    }

    /// Returns true when the caller stopped the transfer.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind() == FailureKind::Cancelled
    }

    /// Returns true when the resource was not acceptable media.
    #[must_use]
    pub fn is_rejected_mimetype(&self) -> bool {
        self.kind() == FailureKind::RejectedMimetype
    }
}

fn display_content_type(content_type: &Option<String>) -> &str {
    content_type.as_deref().unwrap_or("<none>")
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path for context, so callers go through the constructors above.
