use std::io::{IsTerminal, stderr, stdout};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::window::format_countdown;

/// Informational sink for day-window updates. Nothing reported here feeds
/// back into scheduling decisions.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressReporter: Send + Sync {
    fn window_started(&self, target: u32);
    fn attempt_confirmed(&self, completed: u32, target: u32);
    fn quota_reached(&self, completed: u32, target: u32);
    fn countdown(&self, remaining: Duration);
}

pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    /// A visible bar for terminal runs; hidden otherwise so plain logs
    /// stay clean.
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("##-"),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn window_started(&self, target: u32) {
        self.bar.set_length(target as u64);
        self.bar.set_position(0);
        self.bar.set_message("");
    }

    fn attempt_confirmed(&self, completed: u32, _target: u32) {
        self.bar.set_position(completed as u64);
    }

    fn quota_reached(&self, completed: u32, target: u32) {
        self.bar.set_position(completed as u64);
        self.bar.set_message(format!("quota reached ({completed}/{target})"));
    }

    fn countdown(&self, remaining: Duration) {
        self.bar.set_message(format!("next window in {}", format_countdown(remaining)));
    }
}

pub fn console_ui_enabled() -> bool {
    stdout().is_terminal() && stderr().is_terminal()
}
