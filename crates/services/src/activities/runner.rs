use hopelink_core::model::{Activity, ActivityId, ActivityKind, CompletionMode, ProgramId};
use hopelink_core::timer::{BreathingTimer, WalkTimer};
use tracing::{debug, info};

use crate::error::ActivityRunError;
use crate::program_service::{CompletionResult, ProgramService};

/// An opened activity, with the timer its kind needs.
#[derive(Debug, Clone)]
pub enum ActivityPlayer {
    /// Video or audio content the patient confirms manually.
    Media { activity: Activity },
    Journal { activity: Activity },
    Walk { activity: Activity, timer: WalkTimer },
    Breathing {
        activity: Activity,
        timer: BreathingTimer,
    },
}

impl ActivityPlayer {
    #[must_use]
    pub fn activity(&self) -> &Activity {
        match self {
            Self::Media { activity }
            | Self::Journal { activity }
            | Self::Walk { activity, .. }
            | Self::Breathing { activity, .. } => activity,
        }
    }

    #[must_use]
    pub fn completion(&self) -> CompletionMode {
        self.activity().kind().completion()
    }

    /// Whether the player's own completion step is done.
    ///
    /// Media and journal players have no timer, so they are always ready.
    #[must_use]
    pub fn timer_completed(&self) -> bool {
        match self {
            Self::Media { .. } | Self::Journal { .. } => true,
            Self::Walk { timer, .. } => timer.is_completed(),
            Self::Breathing { timer, .. } => timer.is_completed(),
        }
    }
}

/// Opens activities for playback and records their completion.
#[derive(Clone)]
pub struct ActivityRunner {
    programs: ProgramService,
}

impl ActivityRunner {
    #[must_use]
    pub fn new(programs: ProgramService) -> Self {
        Self { programs }
    }

    /// Open an activity. Completed activities can be reopened; locked ones cannot.
    ///
    /// # Errors
    ///
    /// Returns `ActivityRunError::UnknownActivity` or `ActivityRunError::Locked`,
    /// or `ActivityRunError::Program` if the program cannot be loaded.
    pub async fn open(
        &self,
        program_id: ProgramId,
        activity_id: ActivityId,
    ) -> Result<ActivityPlayer, ActivityRunError> {
        let program = self.programs.get(program_id).await?;
        let activity = program
            .activity(activity_id)
            .cloned()
            .ok_or(ActivityRunError::UnknownActivity(activity_id))?;
        if program.is_locked(activity_id) {
            debug!(program = %program_id, activity = %activity_id, "refusing to open locked activity");
            return Err(ActivityRunError::Locked(activity_id));
        }

        let settings = self.programs.settings();
        let declared = activity.duration_minutes();
        let player = match activity.kind().completion() {
            CompletionMode::Manual => ActivityPlayer::Media { activity },
            CompletionMode::Journal => ActivityPlayer::Journal { activity },
            CompletionMode::Timed if activity.kind() == ActivityKind::Walk => ActivityPlayer::Walk {
                timer: WalkTimer::with_settings(
                    declared.unwrap_or(settings.default_walk_minutes()),
                    settings,
                ),
                activity,
            },
            CompletionMode::Timed => ActivityPlayer::Breathing {
                timer: BreathingTimer::with_settings(
                    declared.unwrap_or(settings.default_breathing_minutes()),
                    settings,
                ),
                activity,
            },
        };
        info!(
            program = %program_id,
            activity = %activity_id,
            kind = player.activity().kind().label(),
            "activity opened"
        );
        Ok(player)
    }

    /// Record completion for an opened activity.
    ///
    /// Journal activities need `journal` text; timed activities need their
    /// timer completed first.
    ///
    /// # Errors
    ///
    /// Returns `ActivityRunError::MissingJournal`,
    /// `ActivityRunError::TimerNotCompleted`, or `ActivityRunError::Program`
    /// when the program rejects the completion.
    pub async fn finish(
        &self,
        program_id: ProgramId,
        player: &ActivityPlayer,
        journal: Option<&str>,
    ) -> Result<CompletionResult, ActivityRunError> {
        let activity_id = player.activity().id();
        match player.completion() {
            CompletionMode::Journal => {
                let text = journal.ok_or(ActivityRunError::MissingJournal(activity_id))?;
                let (_entry, result) = self
                    .programs
                    .submit_journal(program_id, activity_id, text)
                    .await?;
                Ok(result)
            }
            CompletionMode::Timed if !player.timer_completed() => {
                Err(ActivityRunError::TimerNotCompleted(activity_id))
            }
            CompletionMode::Timed | CompletionMode::Manual => {
                Ok(self.programs.mark_complete(program_id, activity_id).await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use hopelink_core::model::MarkOutcome;
    use hopelink_core::time::{fixed_clock, fixed_now};
    use storage::{InMemoryRepository, MockDataset};

    const PROGRAM: ProgramId = ProgramId::new(1);

    fn runner() -> ActivityRunner {
        let repo =
            InMemoryRepository::seeded(MockDataset::generate(fixed_now(), 3).unwrap()).unwrap();
        ActivityRunner::new(ProgramService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo),
        ))
    }

    #[tokio::test]
    async fn locked_activity_cannot_be_opened() {
        let err = runner().open(PROGRAM, ActivityId::new(4)).await.unwrap_err();
        assert!(matches!(err, ActivityRunError::Locked(id) if id == ActivityId::new(4)));
    }

    #[tokio::test]
    async fn unknown_activity_cannot_be_opened() {
        let err = runner().open(PROGRAM, ActivityId::new(9)).await.unwrap_err();
        assert!(matches!(err, ActivityRunError::UnknownActivity(_)));
    }

    #[tokio::test]
    async fn completed_media_can_be_replayed() {
        let runner = runner();
        let player = runner.open(PROGRAM, ActivityId::new(1)).await.unwrap();
        assert!(matches!(player, ActivityPlayer::Media { .. }));
        assert_eq!(player.completion(), CompletionMode::Manual);
        let result = runner.finish(PROGRAM, &player, None).await.unwrap();
        assert_eq!(result.outcome, MarkOutcome::AlreadyCompleted);
    }

    #[tokio::test]
    async fn timed_kinds_open_with_their_own_timer() {
        let runner = runner();
        let programs = &runner.programs;
        programs.mark_complete(PROGRAM, ActivityId::new(3)).await.unwrap();
        programs.mark_complete(PROGRAM, ActivityId::new(4)).await.unwrap();

        let walk = runner.open(PROGRAM, ActivityId::new(4)).await.unwrap();
        assert!(matches!(walk, ActivityPlayer::Walk { .. }));
        let breathing = runner.open(PROGRAM, ActivityId::new(5)).await.unwrap();
        assert_eq!(breathing.completion(), CompletionMode::Timed);
        let ActivityPlayer::Breathing { timer, .. } = &breathing else {
            panic!("expected a breathing player");
        };
        assert_eq!(timer.duration_seconds(), 5 * 60);

        let err = runner.finish(PROGRAM, &breathing, None).await.unwrap_err();
        assert!(matches!(err, ActivityRunError::TimerNotCompleted(_)));
    }

    #[tokio::test]
    async fn journal_needs_text() {
        let runner = runner();
        let player = runner.open(PROGRAM, ActivityId::new(3)).await.unwrap();
        let err = runner.finish(PROGRAM, &player, None).await.unwrap_err();
        assert!(matches!(err, ActivityRunError::MissingJournal(_)));

        let result = runner
            .finish(PROGRAM, &player, Some("Meetings with my manager."))
            .await
            .unwrap();
        assert_eq!(
            result.outcome,
            MarkOutcome::Completed {
                unlocked: Some(ActivityId::new(4))
            }
        );
    }

    #[tokio::test]
    async fn walk_requires_completed_timer() {
        let runner = runner();
        let journal = runner.open(PROGRAM, ActivityId::new(3)).await.unwrap();
        runner
            .finish(PROGRAM, &journal, Some("Meetings with my manager."))
            .await
            .unwrap();

        let mut player = runner.open(PROGRAM, ActivityId::new(4)).await.unwrap();
        let ActivityPlayer::Walk { timer, .. } = &mut player else {
            panic!("expected a walk player");
        };
        assert_eq!(timer.target_secs(), 15 * 60);

        let err = runner.finish(PROGRAM, &player, None).await.unwrap_err();
        assert!(matches!(err, ActivityRunError::TimerNotCompleted(_)));

        if let ActivityPlayer::Walk { timer, .. } = &mut player {
            timer.start().unwrap();
            timer.complete().unwrap();
        }
        let result = runner.finish(PROGRAM, &player, None).await.unwrap();
        assert_eq!(result.progress.percent, 80);
        assert_eq!(result.progress.next_activity, Some(ActivityId::new(5)));
    }
}
