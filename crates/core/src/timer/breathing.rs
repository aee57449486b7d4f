use std::time::Duration;

use serde::Serialize;

use super::{ActivityTimer, TickOutcome, TimerError, duration_ms};
use crate::model::ActivitySettings;

/// Box-breathing phase. Each lasts the same fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl BreathPhase {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            BreathPhase::Inhale => BreathPhase::Hold1,
            BreathPhase::Hold1 => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Hold2,
            BreathPhase::Hold2 => BreathPhase::Inhale,
        }
    }

    #[must_use]
    pub fn instruction(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe in slowly through your nose...",
            BreathPhase::Hold1 | BreathPhase::Hold2 => "Hold your breath...",
            BreathPhase::Exhale => "Exhale slowly through your mouth...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingState {
    Idle,
    Running,
    Paused,
    /// Duration reached. Still needs an explicit `complete`.
    Stopped,
    Completed,
}

/// Box-breathing simulator: inhale, hold, exhale, hold, repeat.
#[derive(Debug, Clone)]
pub struct BreathingTimer {
    duration_ms: u64,
    phase_len_ms: u64,
    tick_ms: u64,
    total_ms: u64,
    phase_elapsed_ms: u64,
    phase: BreathPhase,
    state: BreathingState,
}

impl BreathingTimer {
    #[must_use]
    pub fn new(duration_minutes: u32) -> Self {
        Self::with_settings(duration_minutes, &ActivitySettings::default())
    }

    #[must_use]
    pub fn with_settings(duration_minutes: u32, settings: &ActivitySettings) -> Self {
        Self {
            duration_ms: u64::from(duration_minutes) * 60_000,
            phase_len_ms: duration_ms(settings.breathing_phase()),
            tick_ms: duration_ms(settings.breathing_tick()),
            total_ms: 0,
            phase_elapsed_ms: 0,
            phase: BreathPhase::Inhale,
            state: BreathingState::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    #[must_use]
    pub fn state(&self) -> BreathingState {
        self.state
    }

    #[must_use]
    pub fn phase_elapsed(&self) -> Duration {
        Duration::from_millis(self.phase_elapsed_ms)
    }

    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        Duration::from_millis(self.total_ms)
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.total_ms / 1_000
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u64 {
        self.duration_ms / 1_000
    }

    #[must_use]
    pub fn instruction(&self) -> &'static str {
        self.phase.instruction()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == BreathingState::Completed
    }

    /// Relative size of the breathing guide: grows 0.6 → 1.0 while inhaling,
    /// shrinks back while exhaling, holds in between.
    #[must_use]
    pub fn expansion(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let progress = (self.phase_elapsed_ms as f64 / self.phase_len_ms as f64).min(1.0);
        match self.phase {
            BreathPhase::Inhale => 0.6 + progress * 0.4,
            BreathPhase::Hold1 => 1.0,
            BreathPhase::Exhale => 1.0 - progress * 0.4,
            BreathPhase::Hold2 => 0.6,
        }
    }

    /// Start or continue breathing.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::Finished` once the duration was reached and
    /// `TimerError::AlreadyCompleted` after completion.
    pub fn start(&mut self) -> Result<(), TimerError> {
        match self.state {
            BreathingState::Idle | BreathingState::Paused | BreathingState::Running => {
                self.state = BreathingState::Running;
                Ok(())
            }
            BreathingState::Stopped => Err(TimerError::Finished),
            BreathingState::Completed => Err(TimerError::AlreadyCompleted),
        }
    }

    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` unless the timer is running.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state != BreathingState::Running {
            return Err(TimerError::NotRunning);
        }
        self.state = BreathingState::Paused;
        Ok(())
    }

    /// Stop the timer and mark the exercise done.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotStarted` before the first `start`, or
    /// `TimerError::AlreadyCompleted` when called twice.
    pub fn complete(&mut self) -> Result<(), TimerError> {
        match self.state {
            BreathingState::Idle => Err(TimerError::NotStarted),
            BreathingState::Completed => Err(TimerError::AlreadyCompleted),
            BreathingState::Running | BreathingState::Paused | BreathingState::Stopped => {
                self.state = BreathingState::Completed;
                Ok(())
            }
        }
    }
}

impl ActivityTimer for BreathingTimer {
    fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn tick(&mut self) -> TickOutcome {
        if self.state != BreathingState::Running {
            return TickOutcome::Ignored;
        }

        self.total_ms += self.tick_ms;
        if self.total_ms >= self.duration_ms {
            self.state = BreathingState::Stopped;
            return TickOutcome::Stopped;
        }

        self.phase_elapsed_ms += self.tick_ms;
        if self.phase_elapsed_ms >= self.phase_len_ms {
            self.phase_elapsed_ms = 0;
            self.phase = self.phase.next();
            return TickOutcome::PhaseChanged(self.phase);
        }
        TickOutcome::Counted
    }

    fn is_running(&self) -> bool {
        self.state == BreathingState::Running
    }
}
