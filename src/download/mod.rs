//! Media download engine: classification, streaming, progress and cancellation.
//!
//! A download is one GET. The response content-type decides whether the
//! resource is media (`image/*`, `audio/*`, `video/*` with a known extension);
//! anything else is rejected before a file is created. Accepted bodies are
//! streamed chunk by chunk into `<dest>.<ext>`.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Extension derived from the content-type (`image/jpeg` becomes `jpg`)
//! - Progress reported to a caller-owned [`DownloadProgress`]
//! - Cooperative cancellation through a shared [`StopHandle`]
//! - Partial files removed on cancellation and failure
//!
//! # Example
//!
//! ```no_run
//! use media_downloader::download::{DownloadProgress, MediaClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MediaClient::new();
//! let mut progress = DownloadProgress::new();
//! let stop = progress.stop_handle();
//! tokio::spawn(async move {
//!     tokio::signal::ctrl_c().await.ok();
//!     stop.request_stop();
//! });
//! let media = client
//!     .download("https://example.com/song", Path::new("./music/song"), &mut progress)
//!     .await?;
//! println!("Downloaded: {}", media.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
pub mod constants;
mod error;
pub mod mime;
pub mod paths;
mod progress;
pub mod relay;

pub use client::{DownloadedMedia, MediaClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{DownloadError, FailureKind};
pub use mime::{MediaClassification, classify, classify_str};
pub use paths::{destination_path, ensure_parent_dirs};
pub use progress::{DownloadProgress, StopHandle};
pub use relay::{RelayError, RelayOutcome, relay_chunks};
