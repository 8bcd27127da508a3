// Thu Oct 15 2026 - Alex

use indicatif::{ProgressBar, ProgressStyle};

const BYTES_TEMPLATE: &str =
    "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}";

pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Byte-counting bar for dumps. The dumper sets the length once the image
    /// size is known.
    pub fn create_bytes_progress(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(BYTES_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
