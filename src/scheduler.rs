use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::AppError;
use crate::executor::{AttemptOutcome, DepositRunner};
use crate::progress::ProgressReporter;
use crate::window::{DayWindow, draw_delay, draw_target, time_until_next_boundary};

/// Upper bound on one countdown sleep slice, so the visible countdown
/// stays fresh while waiting for the day boundary.
const COUNTDOWN_SLICE: Duration = Duration::from_secs(5);

/// Wall-clock source, injectable for rollover tests.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PacingConfig {
    pub min_per_day: u32,
    pub max_per_day: u32,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub utc_offset_minutes: i32,
}

/// Drives the deposit loop: fire attempts while the day's quota is open,
/// count only confirmed ones, and hold through the boundary once it closes.
pub struct QuotaScheduler<R, P, C> {
    cfg: PacingConfig,
    runner: R,
    progress: P,
    clock: C,
    window: DayWindow,
}

impl<R, P, C> QuotaScheduler<R, P, C>
where
    R: DepositRunner,
    P: ProgressReporter,
    C: Clock,
{
    pub fn new(cfg: PacingConfig, runner: R, progress: P, clock: C) -> Self {
        let window = DayWindow::new(draw_target(cfg.min_per_day, cfg.max_per_day));
        Self {
            cfg,
            runner,
            progress,
            clock,
            window,
        }
    }

    pub fn window(&self) -> &DayWindow {
        &self.window
    }

    /// Runs until cancelled. Attempt failures are absorbed and reported;
    /// only an unrepresentable day boundary escapes as an error.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<(), AppError> {
        info!(daily_target = self.window.target, "Daily target drawn");
        self.progress.window_started(self.window.target);

        while !cancel.is_cancelled() {
            self.step(cancel).await?;
        }

        info!("Scheduler stopped");
        Ok(())
    }

    async fn step(&mut self, cancel: &CancellationToken) -> Result<(), AppError> {
        if self.window.quota_reached() {
            self.wait_for_rollover(cancel).await?;
            return Ok(());
        }

        let outcome = self.runner.attempt().await;
        self.record(&outcome);

        let delay = draw_delay(self.cfg.min_delay_secs, self.cfg.max_delay_secs);
        info!(
            delay_secs = delay.as_secs(),
            remaining_today = self.window.target - self.window.completed,
            "Next attempt scheduled"
        );
        self.pause(delay, cancel).await;
        Ok(())
    }

    /// Failed attempts do not count toward the quota and never stop the
    /// loop; the next attempt keeps its normal delay.
    fn record(&mut self, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Confirmed { tx_hash, .. } => {
                self.window.record_confirmed();
                self.progress.attempt_confirmed(self.window.completed, self.window.target);
                info!(
                    tx = %tx_hash,
                    completed = self.window.completed,
                    daily_target = self.window.target,
                    "Deposit confirmed"
                );
            }
            AttemptOutcome::OnChainFailure { tx_hash, .. } => {
                warn!(tx = %tx_hash, "Deposit included but failed on-chain; continuing");
            }
            AttemptOutcome::TransportError { reason } => {
                warn!("Deposit attempt failed: {reason}; continuing");
            }
        }
    }

    /// Holds in bounded slices until the next local midnight, then resets
    /// the window. The target is re-drawn exactly once per crossing, no
    /// matter how many times the countdown wakes.
    async fn wait_for_rollover(&mut self, cancel: &CancellationToken) -> Result<(), AppError> {
        info!(
            completed = self.window.completed,
            daily_target = self.window.target,
            "Daily quota reached; waiting for next day"
        );
        self.progress.quota_reached(self.window.completed, self.window.target);

        let entered = self.clock.now_utc();
        let until_boundary = time_until_next_boundary(entered, self.cfg.utc_offset_minutes)
            .ok_or_else(|| AppError::DayBoundary(entered.naive_utc()))?;
        let deadline = entered
            + chrono::Duration::from_std(until_boundary).map_err(|_| AppError::DayBoundary(entered.naive_utc()))?;

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }
            let remaining = (deadline - self.clock.now_utc()).to_std().unwrap_or_default();
            if remaining.is_zero() {
                break;
            }
            self.progress.countdown(remaining);
            self.pause(remaining.min(COUNTDOWN_SLICE), cancel).await;
        }

        let target = draw_target(self.cfg.min_per_day, self.cfg.max_per_day);
        self.window.roll_over(target);
        self.progress.window_started(target);
        info!(daily_target = target, "New day window started");
        Ok(())
    }

    async fn pause(&self, delay: Duration, cancel: &CancellationToken) {
        if delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::MockDepositRunner;
    use crate::progress::MockProgressReporter;
    use alloy::primitives::{B256, U256};
    use chrono::TimeZone;
    use evm_inbox_client::FeeQuote;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn pacing(min_per_day: u32, max_per_day: u32) -> PacingConfig {
        PacingConfig {
            min_per_day,
            max_per_day,
            min_delay_secs: 0,
            max_delay_secs: 0,
            utc_offset_minutes: 0,
        }
    }

    fn confirmed() -> AttemptOutcome {
        AttemptOutcome::Confirmed {
            amount_wei: U256::from(1_000u64),
            fee: FeeQuote::legacy(800),
            tx_hash: B256::repeat_byte(0x11),
            events: vec![],
        }
    }

    fn on_chain_failure() -> AttemptOutcome {
        AttemptOutcome::OnChainFailure {
            amount_wei: U256::from(1_000u64),
            fee: FeeQuote::legacy(800),
            tx_hash: B256::repeat_byte(0x22),
        }
    }

    fn transport_error() -> AttemptOutcome {
        AttemptOutcome::TransportError {
            reason: "connection refused".to_string(),
        }
    }

    fn fixed_clock(hour: u32) -> MockClock {
        let mut clock = MockClock::new();
        clock
            .expect_now_utc()
            .returning(move || Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap());
        clock
    }

    fn quiet_progress() -> MockProgressReporter {
        let mut progress = MockProgressReporter::new();
        progress.expect_window_started().return_const(());
        progress.expect_attempt_confirmed().return_const(());
        progress.expect_quota_reached().return_const(());
        progress.expect_countdown().return_const(());
        progress
    }

    #[tokio::test]
    async fn confirmed_attempt_increments_the_counter() {
        let mut runner = MockDepositRunner::new();
        runner.expect_attempt().times(1).returning(|| confirmed());

        let mut scheduler = QuotaScheduler::new(pacing(5, 5), runner, quiet_progress(), fixed_clock(12));
        scheduler.step(&CancellationToken::new()).await.unwrap();

        assert_eq!(scheduler.window.completed, 1);
    }

    #[tokio::test]
    async fn failed_attempts_do_not_count_and_do_not_stop_the_loop() {
        let mut runner = MockDepositRunner::new();
        let mut seq = mockall::Sequence::new();
        runner
            .expect_attempt()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| transport_error());
        runner
            .expect_attempt()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| on_chain_failure());
        runner
            .expect_attempt()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| confirmed());

        let cancel = CancellationToken::new();
        let mut scheduler = QuotaScheduler::new(pacing(5, 5), runner, quiet_progress(), fixed_clock(12));

        scheduler.step(&cancel).await.unwrap();
        assert_eq!(scheduler.window.completed, 0);

        scheduler.step(&cancel).await.unwrap();
        assert_eq!(scheduler.window.completed, 0);

        // A subsequent attempt is still scheduled and fires.
        scheduler.step(&cancel).await.unwrap();
        assert_eq!(scheduler.window.completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_attempt_fires_while_quota_is_reached() {
        let mut runner = MockDepositRunner::new();
        runner.expect_attempt().times(0);

        let cancel = CancellationToken::new();
        let countdown_cancel = cancel.clone();

        let mut progress = MockProgressReporter::new();
        progress.expect_quota_reached().times(1).return_const(());
        // The countdown is the only thing allowed to happen; use it to stop.
        progress.expect_countdown().returning(move |_| countdown_cancel.cancel());
        progress.expect_window_started().times(0);
        progress.expect_attempt_confirmed().times(0);

        let mut scheduler = QuotaScheduler::new(pacing(2, 2), runner, progress, fixed_clock(12));
        scheduler.window.completed = 2;

        scheduler.step(&cancel).await.unwrap();

        // Cancellation during the hold must not reset the window.
        assert_eq!(scheduler.window.completed, 2);
        assert_eq!(scheduler.window.target, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rollover_resets_exactly_once_despite_spurious_wakes() {
        let runner = MockDepositRunner::new();

        let mut progress = MockProgressReporter::new();
        progress.expect_quota_reached().times(1).return_const(());
        progress.expect_countdown().return_const(());
        // The reset must happen exactly once per crossing.
        progress.expect_window_started().times(1).return_const(());

        // Three seconds before local midnight, advancing one second per
        // observation; several countdown wakes happen before the crossing.
        let ticks = Arc::new(AtomicI64::new(0));
        let mut clock = MockClock::new();
        clock.expect_now_utc().returning(move || {
            let tick = ticks.fetch_add(1, Ordering::SeqCst);
            Utc.with_ymd_and_hms(2024, 5, 10, 23, 59, 57).unwrap() + chrono::Duration::seconds(tick)
        });

        let mut scheduler = QuotaScheduler::new(pacing(7, 7), runner, progress, clock);
        scheduler.window.completed = 7;

        scheduler.step(&CancellationToken::new()).await.unwrap();

        assert_eq!(scheduler.window, DayWindow { target: 7, completed: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn two_per_day_fires_exactly_twice_then_holds() {
        let mut runner = MockDepositRunner::new();
        runner.expect_attempt().times(2).returning(|| confirmed());

        let cancel = CancellationToken::new();
        let countdown_cancel = cancel.clone();

        let mut progress = MockProgressReporter::new();
        progress.expect_window_started().times(1).return_const(());
        progress.expect_attempt_confirmed().times(2).return_const(());
        progress.expect_quota_reached().times(1).return_const(());
        progress.expect_countdown().returning(move |_| countdown_cancel.cancel());

        let mut scheduler = QuotaScheduler::new(pacing(2, 2), runner, progress, fixed_clock(12));
        scheduler.run(&cancel).await.unwrap();

        assert_eq!(scheduler.window.completed, 2);
        assert_eq!(scheduler.window.target, 2);
    }
}
