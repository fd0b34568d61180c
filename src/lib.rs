//! Media Downloader Core Library
//!
//! Downloads image, audio and video resources from a URL to local storage,
//! reporting progress to a caller-owned handle and stopping cooperatively on
//! request.
//!
//! # Architecture
//!
//! - [`download`] - content-type classification and the streaming download
//!   controller
//!
//! The terminal outcome of a download is `Ok(DownloadedMedia)` or a
//! [`DownloadError`] whose [`kind`](DownloadError::kind) tells a rejected
//! mimetype and a user cancellation apart from transport failures.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
mod user_agent;

// Re-export commonly used types
pub use download::{
    ClientConfig, ConfigError, DownloadError, DownloadProgress, DownloadedMedia, FailureKind,
    MediaClassification, MediaClient, StopHandle, classify,
};
