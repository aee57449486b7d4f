use std::sync::Arc;

use hopelink_core::model::{
    ActivityId, ActivityKind, ActivitySettings, JournalDraft, JournalEntry, MarkOutcome, Program,
    ProgramError, ProgramId, ProgramProgress, UserId,
};
use storage::repository::{JournalRepository, ProgramRepository};
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::ProgramServiceError;

/// Outcome of completing an activity, with the program's progress afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub activity_id: ActivityId,
    pub outcome: MarkOutcome,
    pub progress: ProgramProgress,
}

/// Loads programs and applies completion against the repository.
#[derive(Clone)]
pub struct ProgramService {
    clock: Clock,
    settings: ActivitySettings,
    programs: Arc<dyn ProgramRepository>,
    journals: Arc<dyn JournalRepository>,
}

impl ProgramService {
    #[must_use]
    pub fn new(
        clock: Clock,
        programs: Arc<dyn ProgramRepository>,
        journals: Arc<dyn JournalRepository>,
    ) -> Self {
        Self {
            clock,
            settings: ActivitySettings::default(),
            programs,
            journals,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ActivitySettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ActivitySettings {
        &self.settings
    }

    /// # Errors
    ///
    /// Returns `ProgramServiceError::Storage` if the program cannot be loaded.
    pub async fn get(&self, id: ProgramId) -> Result<Program, ProgramServiceError> {
        debug!(program = %id, "loading program");
        Ok(self.programs.get_program(id).await?)
    }

    /// Program assigned to the given patient.
    ///
    /// # Errors
    ///
    /// Returns `ProgramServiceError::NoProgram` if nothing is assigned.
    pub async fn assigned(&self, user: UserId) -> Result<Program, ProgramServiceError> {
        self.programs
            .assigned_program(user)
            .await?
            .ok_or(ProgramServiceError::NoProgram(user))
    }

    /// Mark an activity complete and persist the program.
    ///
    /// Nothing is written when the activity was already completed or the
    /// call fails.
    ///
    /// # Errors
    ///
    /// Returns `ProgramServiceError::Program` for unknown or locked activities
    /// and `ProgramServiceError::Storage` on repository failures.
    pub async fn mark_complete(
        &self,
        program_id: ProgramId,
        activity_id: ActivityId,
    ) -> Result<CompletionResult, ProgramServiceError> {
        let mut program = self.get(program_id).await?;
        let outcome = program.mark_complete(activity_id).inspect_err(|err| {
            warn!(program = %program_id, activity = %activity_id, %err, "completion rejected");
        })?;

        match outcome {
            MarkOutcome::Completed { unlocked } => {
                self.programs.save_program(&program).await?;
                info!(
                    program = %program_id,
                    activity = %activity_id,
                    unlocked = ?unlocked,
                    progress = program.progress(),
                    "activity completed"
                );
            }
            MarkOutcome::AlreadyCompleted => {
                debug!(program = %program_id, activity = %activity_id, "activity already completed");
            }
        }

        Ok(CompletionResult {
            activity_id,
            outcome,
            progress: program.progress_view(),
        })
    }

    /// Validate and store a journal entry, then complete its activity.
    ///
    /// # Errors
    ///
    /// Returns `ProgramServiceError::WrongActivityKind` for non-journal
    /// activities, `ProgramServiceError::Journal` if the entry is too short, and
    /// `ProgramServiceError::Program` if the activity is unknown or locked. The
    /// entry is only stored once those checks pass.
    pub async fn submit_journal(
        &self,
        program_id: ProgramId,
        activity_id: ActivityId,
        text: &str,
    ) -> Result<(JournalEntry, CompletionResult), ProgramServiceError> {
        let program = self.get(program_id).await?;
        let activity = program
            .activity(activity_id)
            .ok_or(ProgramError::UnknownActivity(activity_id))?;
        if activity.kind() != ActivityKind::Journal {
            return Err(ProgramServiceError::WrongActivityKind {
                activity: activity_id,
                expected: ActivityKind::Journal,
                found: activity.kind(),
            });
        }
        if program.is_locked(activity_id) {
            return Err(ProgramError::Locked(activity_id).into());
        }

        let entry = JournalDraft::new(activity_id, text)
            .validate_with(self.clock.now(), self.settings.journal_min_chars())?;
        self.journals.append_entry(&entry).await?;
        info!(activity = %activity_id, entry = %entry.id(), "journal entry saved");

        let result = self.mark_complete(program_id, activity_id).await?;
        Ok((entry, result))
    }

    /// # Errors
    ///
    /// Returns `ProgramServiceError::Storage` on repository failures.
    pub async fn journal_entries(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<JournalEntry>, ProgramServiceError> {
        Ok(self.journals.entries_for(activity_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopelink_core::model::JournalError;
    use hopelink_core::time::{fixed_clock, fixed_now};
    use storage::{InMemoryRepository, MockDataset};

    fn service() -> ProgramService {
        let repo =
            InMemoryRepository::seeded(MockDataset::generate(fixed_now(), 3).unwrap()).unwrap();
        ProgramService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo))
    }

    const PROGRAM: ProgramId = ProgramId::new(1);

    #[tokio::test]
    async fn completing_persists_and_unlocks_next() {
        let svc = service();
        let result = svc.mark_complete(PROGRAM, ActivityId::new(3)).await.unwrap();
        assert_eq!(
            result.outcome,
            MarkOutcome::Completed {
                unlocked: Some(ActivityId::new(4))
            }
        );
        assert_eq!(result.progress.percent, 60);

        let program = svc.get(PROGRAM).await.unwrap();
        assert!(!program.is_locked(ActivityId::new(4)));
        assert!(program.is_locked(ActivityId::new(5)));
    }

    #[tokio::test]
    async fn unknown_activity_leaves_program_untouched() {
        let svc = service();
        let err = svc
            .mark_complete(PROGRAM, ActivityId::new(42))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgramServiceError::Program(ProgramError::UnknownActivity(_))
        ));
        assert_eq!(svc.get(PROGRAM).await.unwrap().progress(), 40);
    }

    #[tokio::test]
    async fn repeat_completion_is_a_no_op() {
        let svc = service();
        let result = svc.mark_complete(PROGRAM, ActivityId::new(1)).await.unwrap();
        assert_eq!(result.outcome, MarkOutcome::AlreadyCompleted);
        assert_eq!(result.progress.percent, 40);
    }

    #[tokio::test]
    async fn short_journal_is_not_stored() {
        let svc = service();
        let err = svc
            .submit_journal(PROGRAM, ActivityId::new(3), "meh")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgramServiceError::Journal(JournalError::TooShort { .. })
        ));
        assert!(svc.journal_entries(ActivityId::new(3)).await.unwrap().is_empty());
        assert_eq!(svc.get(PROGRAM).await.unwrap().progress(), 40);
    }

    #[tokio::test]
    async fn journal_completes_its_activity() {
        let svc = service();
        let (entry, result) = svc
            .submit_journal(
                PROGRAM,
                ActivityId::new(3),
                "Crowded trains make my chest tight.",
            )
            .await
            .unwrap();
        assert_eq!(entry.created_at(), fixed_now());
        assert_eq!(result.progress.percent, 60);
        assert_eq!(svc.journal_entries(ActivityId::new(3)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn journal_rejects_other_kinds() {
        let svc = service();
        let err = svc
            .submit_journal(PROGRAM, ActivityId::new(4), "A long enough entry.")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgramServiceError::WrongActivityKind {
                found: ActivityKind::Walk,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_assignment_is_reported() {
        let repo = InMemoryRepository::new();
        let svc = ProgramService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo));
        assert!(matches!(
            svc.assigned(UserId::new(1)).await,
            Err(ProgramServiceError::NoProgram(_))
        ));
    }
}
