use std::time::Duration;

use hopelink_core::timer::{ActivityTimer, TickOutcome};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// Why a drive loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveEnd {
    /// The timer reached its duration and stopped itself.
    TimerStopped,
    /// The stop signal fired, or its sender went away.
    Cancelled,
    /// The timer was not running when the loop checked it.
    NotRunning,
}

/// Tick `timer` at its own period until it stops or `stop` turns `true`.
pub async fn drive<T, F>(timer: &mut T, stop: watch::Receiver<bool>, on_tick: F) -> DriveEnd
where
    T: ActivityTimer,
    F: FnMut(&T, TickOutcome),
{
    let period = timer.tick_period();
    drive_every(timer, period, stop, on_tick).await
}

/// Like [`drive`] but with an explicit wall-clock period.
///
/// The timer still counts its own tick length on every tick, so a shorter
/// `period` fast-forwards the activity.
pub async fn drive_every<T, F>(
    timer: &mut T,
    period: Duration,
    mut stop: watch::Receiver<bool>,
    mut on_tick: F,
) -> DriveEnd
where
    T: ActivityTimer,
    F: FnMut(&T, TickOutcome),
{
    if *stop.borrow_and_update() {
        return DriveEnd::Cancelled;
    }
    if !timer.is_running() {
        return DriveEnd::NotRunning;
    }

    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow_and_update() {
                    debug!("timer drive cancelled");
                    return DriveEnd::Cancelled;
                }
            }

            _ = ticks.tick() => {
                let outcome = timer.tick();
                on_tick(&*timer, outcome);
                match outcome {
                    TickOutcome::Stopped => return DriveEnd::TimerStopped,
                    TickOutcome::Ignored => return DriveEnd::NotRunning,
                    TickOutcome::Counted | TickOutcome::PhaseChanged(_) => {}
                }
            }
        }
    }
}
