//! Tick-driven state machines behind the timed activities.
//!
//! The machines never read the wall clock. A driver calls [`ActivityTimer::tick`]
//! once per [`ActivityTimer::tick_period`] while the timer reports running.

mod breathing;
mod walk;

use std::time::Duration;

use thiserror::Error;

pub use breathing::{BreathPhase, BreathingState, BreathingTimer};
pub use walk::{WalkState, WalkTimer, format_clock};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerError {
    #[error("timer has not been started")]
    NotStarted,

    #[error("timer is not running")]
    NotRunning,

    #[error("timer is not paused")]
    NotPaused,

    #[error("timer is paused; resume it instead")]
    Paused,

    #[error("timer already reached its duration")]
    Finished,

    #[error("activity already completed")]
    AlreadyCompleted,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed.
    Ignored,
    /// Time accumulated without a visible transition.
    Counted,
    /// Breathing moved into a new phase.
    PhaseChanged(BreathPhase),
    /// Configured duration reached; the timer stopped itself.
    Stopped,
}

/// Common surface for timers driven by a periodic tick.
pub trait ActivityTimer {
    fn tick_period(&self) -> Duration;

    fn tick(&mut self) -> TickOutcome;

    fn is_running(&self) -> bool;
}

pub(crate) fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
