use std::time::Duration;

use serde::Serialize;

use super::{ActivityTimer, TickOutcome, TimerError, duration_ms};
use crate::model::ActivitySettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Walk stopwatch. Accumulates the tick length while running; reaching the
/// target does not complete the walk.
#[derive(Debug, Clone)]
pub struct WalkTimer {
    target_secs: u64,
    elapsed_ms: u64,
    tick: Duration,
    state: WalkState,
}

impl WalkTimer {
    #[must_use]
    pub fn new(target_minutes: u32) -> Self {
        Self::with_settings(target_minutes, &ActivitySettings::default())
    }

    #[must_use]
    pub fn with_settings(target_minutes: u32, settings: &ActivitySettings) -> Self {
        Self {
            target_secs: u64::from(target_minutes) * 60,
            elapsed_ms: 0,
            tick: settings.walk_tick(),
            state: WalkState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> WalkState {
        self.state
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1_000
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    #[must_use]
    pub fn target_secs(&self) -> u64 {
        self.target_secs
    }

    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.elapsed_secs() >= self.target_secs
    }

    /// Share of the target walked, capped at 100.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.target_secs == 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.elapsed_ms as f64 / (self.target_secs * 1_000) as f64 * 100.0;
        pct.min(100.0)
    }

    /// `elapsed / target` as `m:ss / m:ss`.
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.elapsed_secs()),
            format_clock(self.target_secs)
        )
    }

    /// # Errors
    ///
    /// Returns `TimerError::Paused` for a paused walk (use `resume`) and
    /// `TimerError::AlreadyCompleted` after completion.
    pub fn start(&mut self) -> Result<(), TimerError> {
        match self.state {
            WalkState::Idle => {
                self.state = WalkState::Running;
                Ok(())
            }
            WalkState::Running => Ok(()),
            WalkState::Paused => Err(TimerError::Paused),
            WalkState::Completed => Err(TimerError::AlreadyCompleted),
        }
    }

    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` unless the walk is running.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state != WalkState::Running {
            return Err(TimerError::NotRunning);
        }
        self.state = WalkState::Paused;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TimerError::NotPaused` unless the walk is paused.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        if self.state != WalkState::Paused {
            return Err(TimerError::NotPaused);
        }
        self.state = WalkState::Running;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TimerError::NotStarted` before `start`, or
    /// `TimerError::AlreadyCompleted` when called twice.
    pub fn complete(&mut self) -> Result<(), TimerError> {
        match self.state {
            WalkState::Idle => Err(TimerError::NotStarted),
            WalkState::Completed => Err(TimerError::AlreadyCompleted),
            WalkState::Running | WalkState::Paused => {
                self.state = WalkState::Completed;
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == WalkState::Completed
    }
}

impl ActivityTimer for WalkTimer {
    fn tick_period(&self) -> Duration {
        self.tick
    }

    fn tick(&mut self) -> TickOutcome {
        if self.state != WalkState::Running {
            return TickOutcome::Ignored;
        }
        self.elapsed_ms += duration_ms(self.tick);
        TickOutcome::Counted
    }

    fn is_running(&self) -> bool {
        self.state == WalkState::Running
    }
}

/// Format seconds as `m:ss`.
#[must_use]
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
