//! Terminal playback for a single activity.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use hopelink_core::model::{ActivityId, ProgramId};
use hopelink_core::timer::{ActivityTimer, BreathingTimer, TickOutcome, WalkTimer};
use services::{ActivityPlayer, ActivityRunner, CompletionResult, DriveEnd, drive_every};
use tokio::sync::watch;
use tracing::debug;

pub struct PlayOptions<'a> {
    pub journal: Option<&'a str>,
    pub speed: f64,
}

fn scaled(period: Duration, speed: f64) -> Result<Duration> {
    if !speed.is_finite() || speed <= 0.0 {
        bail!("--speed must be a positive number, got {speed}");
    }
    let scaled = Duration::try_from_secs_f64(period.as_secs_f64() / speed)
        .context("--speed is out of range")?;
    Ok(scaled.max(Duration::from_millis(1)))
}

/// Stop channel that also fires on Ctrl-C.
fn stop_channel() -> (Arc<watch::Sender<bool>>, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(false);
    let tx = Arc::new(tx);
    let on_signal = Arc::clone(&tx);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted");
            on_signal.send_replace(true);
        }
    });
    (tx, rx)
}

async fn walk(timer: &mut WalkTimer, speed: f64) -> Result<bool> {
    let period = scaled(timer.tick_period(), speed)?;
    timer.start()?;
    println!("Walk started: {}", timer.display());

    let (tx, rx) = stop_channel();
    drive_every(timer, period, rx, |timer, _| {
        if timer.elapsed_secs() % 60 == 0 {
            println!("  {}", timer.display());
        }
        if timer.reached_target() {
            tx.send_replace(true);
        }
    })
    .await;

    if !timer.reached_target() {
        println!("Walk stopped at {}", timer.display());
        return Ok(false);
    }
    timer.complete()?;
    println!("Walk complete: {}", timer.display());
    Ok(true)
}

async fn breathe(timer: &mut BreathingTimer, speed: f64) -> Result<bool> {
    let period = scaled(timer.tick_period(), speed)?;
    timer.start()?;
    println!("{}", timer.instruction());

    let (_tx, rx) = stop_channel();
    let end = drive_every(timer, period, rx, |_, outcome| {
        if let TickOutcome::PhaseChanged(phase) = outcome {
            println!("{}", phase.instruction());
        }
    })
    .await;

    if end != DriveEnd::TimerStopped {
        println!(
            "Breathing stopped after {}s of {}s",
            timer.elapsed_seconds(),
            timer.duration_seconds()
        );
        return Ok(false);
    }
    timer.complete()?;
    println!("Breathing exercise complete");
    Ok(true)
}

/// Open, play and finish one activity. Returns `None` when playback was
/// interrupted before the activity could be completed.
pub async fn run(
    runner: &ActivityRunner,
    program_id: ProgramId,
    activity_id: ActivityId,
    options: PlayOptions<'_>,
) -> Result<Option<CompletionResult>> {
    let mut player = runner.open(program_id, activity_id).await?;
    let activity = player.activity();
    println!("{} ({})", activity.title(), activity.kind().label());
    println!("{}", activity.description());

    let finished = match &mut player {
        ActivityPlayer::Media { activity } => {
            println!("Content: {}", activity.content());
            true
        }
        ActivityPlayer::Journal { .. } => true,
        ActivityPlayer::Walk { timer, .. } => walk(timer, options.speed).await?,
        ActivityPlayer::Breathing { timer, .. } => breathe(timer, options.speed).await?,
    };
    if !finished {
        return Ok(None);
    }

    let result = runner.finish(program_id, &player, options.journal).await?;
    Ok(Some(result))
}
