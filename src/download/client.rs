//! Streaming media download controller.
//!
//! [`MediaClient`] sends one GET per call, classifies the response
//! content-type, and relays the body into `<dest>.<ext>` while reporting
//! progress and honoring stop requests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tokio::fs::File;
use tokio::io::BufWriter;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::config::{ClientConfig, ConfigError};
use super::error::DownloadError;
use super::mime::{self, MediaClassification};
use super::paths::{destination_path, ensure_parent_dirs};
use super::progress::DownloadProgress;
use super::relay::{RelayError, RelayOutcome, relay_chunks};

/// HTTP client for downloading media with progress and cancellation.
///
/// Create once and reuse; the underlying connection pool is shared by clones.
///
/// # Example
///
/// ```no_run
/// use media_downloader::{DownloadProgress, MediaClient};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MediaClient::new();
/// let mut progress = DownloadProgress::new();
/// let media = client
///     .download("https://example.com/cat", Path::new("./media/cat"), &mut progress)
///     .await?;
/// println!("saved {} ({})", media.path.display(), media.extension);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MediaClient {
    client: Client,
}

/// A completed media download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedMedia {
    /// Final output path, `<dest>.<extension>`.
    pub path: PathBuf,
    /// Extension chosen from the response content-type.
    pub extension: String,
    /// Bytes written to `path`.
    pub bytes_written: u64,
    /// Declared content length, when the server sent one.
    pub content_length: Option<u64>,
}

impl Default for MediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaClient {
    /// Creates a client with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static default
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is out of range or the HTTP client
    /// cannot be built.
    #[instrument(level = "debug")]
    pub fn with_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .gzip(true)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ConfigError::Build)?;
        Ok(Self { client })
    }

    /// Downloads `url` into `<dest>.<ext>` if it is image, audio or video content.
    ///
    /// # Errors
    ///
    /// See [`download_with_observer`](Self::download_with_observer).
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: &mut DownloadProgress,
    ) -> Result<DownloadedMedia, DownloadError> {
        self.download_with_observer(url, dest, progress, |_| {})
            .await
    }

    /// Downloads `url` and calls `observer` after every progress update.
    ///
    /// `dest` is the destination without extension; the extension comes from
    /// the response content-type. Parent directories are created as needed and
    /// an existing file at the final path is truncated.
    ///
    /// The stop flag on `progress` is checked before each chunk is written.
    /// Once it is set the body stream is dropped, which aborts the request.
    /// A partially written file is removed on cancellation and on failure, so
    /// the final path only ever holds a complete download.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::RejectedMimetype`] if the content-type is not
    ///   acceptable media; no file is created.
    /// - [`DownloadError::Cancelled`] if a stop was requested mid-transfer.
    /// - [`DownloadError::InvalidUrl`], [`DownloadError::Network`],
    ///   [`DownloadError::Timeout`], [`DownloadError::HttpStatus`] or
    ///   [`DownloadError::Io`] for transport failures.
    #[must_use = "download result contains the path to the saved media"]
    #[instrument(skip(self, progress, observer), fields(url = %url, dest = %dest.display()))]
    pub async fn download_with_observer<F>(
        &self,
        url: &str,
        dest: &Path,
        progress: &mut DownloadProgress,
        observer: F,
    ) -> Result<DownloadedMedia, DownloadError>
    where
        F: FnMut(&DownloadProgress),
    {
        debug!("starting download");

        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let MediaClassification::Accepted { extension } = mime::classify(content_type.as_deref())
        else {
            debug!(content_type = ?content_type, "rejected non-media response");
            return Err(DownloadError::rejected_mimetype(url, content_type));
        };

        let content_length = declared_content_length(&response);
        let file_path = destination_path(dest, &extension);

        ensure_parent_dirs(dest)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;
        let file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;
        debug!(
            path = %file_path.display(),
            extension = %extension,
            content_length = ?content_length,
            "classified media, streaming to disk"
        );

        let outcome = stream_to_file(file, response, content_length, progress, observer).await;

        match outcome {
            Ok(RelayOutcome::Completed { bytes_written }) => {
                info!(
                    path = %file_path.display(),
                    bytes = bytes_written,
                    "download complete"
                );
                Ok(DownloadedMedia {
                    path: file_path,
                    extension,
                    bytes_written,
                    content_length,
                })
            }
            Ok(RelayOutcome::Stopped { bytes_written }) => {
                info!(bytes = bytes_written, "download cancelled");
                remove_partial_file(&file_path).await;
                Err(DownloadError::cancelled(url))
            }
            Err(RelayError::Source(e)) => {
                remove_partial_file(&file_path).await;
                Err(DownloadError::network(url, e))
            }
            Err(RelayError::Sink(e)) => {
                remove_partial_file(&file_path).await;
                Err(DownloadError::io(file_path, e))
            }
        }
    }
}

/// Relays the response body into `file`.
///
/// The file and the body stream are both owned here, so they are closed and
/// released on every return path before the caller inspects the outcome.
async fn stream_to_file<F>(
    file: File,
    response: reqwest::Response,
    content_length: Option<u64>,
    progress: &mut DownloadProgress,
    observer: F,
) -> Result<RelayOutcome, RelayError<reqwest::Error>>
where
    F: FnMut(&DownloadProgress),
{
    let mut writer = BufWriter::new(file);
    relay_chunks(
        response.bytes_stream(),
        &mut writer,
        content_length,
        progress,
        observer,
    )
    .await
}

async fn remove_partial_file(path: &Path) {
    debug!(path = %path.display(), "cleaning up partial file");
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "failed to remove partial file");
    }
}

fn declared_content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
