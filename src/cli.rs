//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download an image, audio or video resource to disk.
///
/// The file extension is chosen from the response content-type and appended
/// to DEST. Non-media responses are rejected without writing anything.
#[derive(Parser, Debug)]
#[command(name = "media-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// URL of the media resource
    pub url: String,

    /// Destination path without extension (parent directories are created)
    pub dest: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output and the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Connect timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Read idle timeout in seconds (1-3600); long transfers are not limited
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Config file path (default: $XDG_CONFIG_HOME/media-downloader/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Default log level from verbosity flags; `RUST_LOG` takes priority over this.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
