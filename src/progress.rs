use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

/// Progress indicator manager
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    enabled: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(quiet: bool) -> Self {
        // Only draw when stdout is a terminal so piped output stays clean
        let enabled = !quiet && io::stdout().is_terminal();

        Self {
            multi: Arc::new(MultiProgress::new()),
            enabled,
        }
    }

    /// Create a spinner for a page load
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style.tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Spinner shown while a page of records is loading; cleared on drop
pub struct LoadProgress {
    spinner: Option<ProgressBar>,
}

impl LoadProgress {
    pub fn new(manager: Arc<ProgressManager>, message: &str) -> Self {
        Self {
            spinner: manager.create_spinner(message),
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

impl Drop for LoadProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

/// Progress messages for page loads
pub mod messages {
    use rust_i18n::t;

    pub fn restoring() -> String {
        t!("progress.restoring").to_string()
    }

    pub fn loading(count: u32) -> String {
        t!("progress.loading", count = count).to_string()
    }

    pub fn loaded(count: usize, total: usize) -> String {
        t!("progress.loaded", count = count, total = total).to_string()
    }
}
