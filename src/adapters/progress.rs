use crate::core::{ProgressReporter, UploadProgress};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Byte-level upload bar. Appears on the first computable update and is
/// cleared on reset.
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
    visible: bool,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            visible: true,
        }
    }

    /// Tracks progress without drawing anything.
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            visible: false,
        }
    }

    pub fn is_active(&self) -> bool {
        match self.bar.lock() {
            Ok(guard) => guard.is_some(),
            Err(_) => false,
        }
    }

    pub fn position(&self) -> u64 {
        let Ok(guard) = self.bar.lock() else {
            return 0;
        };
        guard.as_ref().map(ProgressBar::position).unwrap_or(0)
    }

    fn create_bar(&self, total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        if !self.visible {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.green/white}] {bytes}/{total_bytes} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);
        bar.set_message("Uploading");
        bar
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TerminalProgress {
    fn update(&self, progress: UploadProgress) {
        if !progress.is_length_computable() {
            return;
        }

        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        let bar = guard.get_or_insert_with(|| self.create_bar(progress.total));
        bar.set_length(progress.total);
        bar.set_position(progress.loaded.min(progress.total));
    }

    fn reset(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.set_position(0);
                bar.finish_and_clear();
            }
        }
    }
}
