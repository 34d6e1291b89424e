use std::time::Duration;

use chrono::{DateTime, Days, Duration as ChronoDuration, Utc};
use rand::Rng;

/// Current 24-hour accounting period. Never persisted; a restart begins a
/// fresh window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub target: u32,
    pub completed: u32,
}

impl DayWindow {
    pub fn new(target: u32) -> Self {
        Self { target, completed: 0 }
    }

    pub fn quota_reached(&self) -> bool {
        self.completed >= self.target
    }

    pub fn record_confirmed(&mut self) {
        self.completed += 1;
    }

    /// Starts the next window. Called exactly once per boundary crossing.
    pub fn roll_over(&mut self, target: u32) {
        self.target = target;
        self.completed = 0;
    }
}

/// Daily attempt quota, re-drawn once per window.
pub fn draw_target(min_per_day: u32, max_per_day: u32) -> u32 {
    rand::thread_rng().gen_range(min_per_day..=max_per_day)
}

/// Inter-attempt jitter, re-drawn for every attempt.
pub fn draw_delay(min_secs: u64, max_secs: u64) -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(min_secs..=max_secs))
}

/// Continuous-uniform deposit amount in ETH.
pub fn draw_amount_eth(min_eth: f64, max_eth: f64) -> f64 {
    rand::thread_rng().gen_range(min_eth..=max_eth)
}

/// Time left until the next local midnight under the signed UTC offset.
/// `None` when the boundary is not representable.
pub fn time_until_next_boundary(now: DateTime<Utc>, offset_minutes: i32) -> Option<Duration> {
    let local = now.naive_utc() + ChronoDuration::minutes(offset_minutes as i64);
    let next_midnight = local.date().checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?;
    (next_midnight - local).to_std().ok()
}

pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
