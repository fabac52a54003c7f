//! Progress indicators.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a byte-count progress bar for a download.
///
/// The length is unknown until the server reports one; callers set it from
/// the first progress callback. Draws to stderr, which indicatif silences
/// automatically when it isn't a terminal.
pub fn download_bar(label: &str) -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {msg} [{bar:32.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap()
            .progress_chars("█░░"),
    );
    bar.set_message(label.to_string());
    bar
}

/// Create a spinner for an indeterminate operation.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_bar_accepts_position_updates() {
        let bar = download_bar("node.tar.gz");
        bar.set_length(100);
        bar.set_position(50);
        bar.finish_and_clear();
    }

    #[test]
    fn spinner_ticks_without_panicking() {
        let bar = spinner("checking node...");
        bar.tick();
        bar.finish_and_clear();
    }
}
