//! Progress bar rendering for a single download.

use indicatif::{ProgressBar, ProgressStyle};
use media_downloader::DownloadProgress;

const PERCENT_TEMPLATE: &str = "{bar:40} {percent:>3}% {msg}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg}";

/// Whether to draw a progress bar at all.
pub(crate) fn should_show_progress(stderr_is_terminal: bool, quiet: bool) -> bool {
    stderr_is_terminal && !quiet
}

/// Terminal view of a [`DownloadProgress`].
pub(crate) struct ProgressView {
    bar: ProgressBar,
    showing_percent: bool,
}

impl ProgressView {
    pub(crate) fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            bar,
            showing_percent: false,
        }
    }

    /// Redraws from the latest progress values.
    pub(crate) fn update(&mut self, progress: &DownloadProgress) {
        if progress.knows_percent {
            if !self.showing_percent {
                self.bar.set_style(
                    ProgressStyle::with_template(PERCENT_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                self.bar.set_length(100);
                self.showing_percent = true;
            }
            self.bar.set_position(percent_position(progress.percent));
        } else {
            self.bar.tick();
        }
        self.bar
            .set_message(format!("{} bytes", progress.bytes_written));
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_position(percent: f64) -> u64 {
    (percent.clamp(0.0, 1.0) * 100.0).round() as u64
}
