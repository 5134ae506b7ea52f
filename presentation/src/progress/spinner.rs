//! Spinner shown while a response is outstanding

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Indeterminate spinner that clears itself when dropped.
pub struct WaitSpinner {
    bar: ProgressBar,
}

impl WaitSpinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Start only when `enabled`.
    pub fn start_if(enabled: bool, message: impl Into<String>) -> Option<Self> {
        enabled.then(|| Self::start(message))
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Drop for WaitSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
