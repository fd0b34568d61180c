//! CLI entry point for the media downloader.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use media_downloader::{DownloadProgress, FailureKind, MediaClient};
use tracing::{debug, error, info, warn};

mod app_config;
mod cli;
mod progress_ui;

use cli::Args;
use progress_ui::{ProgressView, should_show_progress};

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    Success,
    Failure,
    RejectedMimetype,
    Cancelled,
}

impl ProcessExit {
    fn from_failure(kind: FailureKind) -> Self {
        match kind {
            FailureKind::RejectedMimetype => Self::RejectedMimetype,
            FailureKind::Cancelled => Self::Cancelled,
            FailureKind::Transport => Self::Failure,
        }
    }

    fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::RejectedMimetype => 2,
            Self::Cancelled => 130,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!(error = %format!("{e:#}"), "media-downloader failed");
            eprintln!("error: {e:#}");
            ProcessExit::Failure.into()
        }
    }
}

async fn run(args: Args) -> Result<ProcessExit> {
    let file_config =
        app_config::load_config(args.config.as_deref()).context("failed to load configuration")?;
    let client_config = app_config::client_config(&args, file_config.as_ref());
    let client = MediaClient::with_config(&client_config).context("invalid client configuration")?;

    let mut progress = DownloadProgress::new();
    let stop = progress.stop_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping download");
            stop.request_stop();
        }
    });

    let mut view = ProgressView::new(should_show_progress(
        io::stderr().is_terminal(),
        args.quiet,
    ));
    let result = client
        .download_with_observer(&args.url, &args.dest, &mut progress, |p| view.update(p))
        .await;
    view.finish();
    interrupt.abort();

    match result {
        Ok(media) => {
            info!(
                path = %media.path.display(),
                bytes = media.bytes_written,
                "saved media"
            );
            println!("{}", media.path.display());
            Ok(ProcessExit::Success)
        }
        Err(e) => {
            let kind = e.kind();
            match kind {
                FailureKind::Transport => error!(kind = kind.as_str(), "{e}"),
                FailureKind::RejectedMimetype | FailureKind::Cancelled => {
                    warn!(kind = kind.as_str(), "{e}");
                }
            }
            eprintln!("{e}");
            Ok(ProcessExit::from_failure(kind))
        }
    }
}
