use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::model::activity::{Activity, ActivityStatus};
use crate::model::ids::{ActivityId, DoctorId, ProgramId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgramError {
    #[error("program name cannot be empty")]
    EmptyName,

    #[error("program has no activities")]
    Empty,

    #[error("activity {0} appears more than once")]
    DuplicateActivity(ActivityId),

    #[error("activity orders must run 1..={expected_max} without gaps, found {found}")]
    NonContiguousOrder { expected_max: u32, found: u32 },

    #[error("activity {0} is not part of this program")]
    UnknownActivity(ActivityId),

    #[error("activity {0} is locked until the previous activity is completed")]
    Locked(ActivityId),
}

//
// ─── PROGRAM ───────────────────────────────────────────────────────────────────
//

/// Doctor who assigned a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedDoctor {
    pub doctor_id: DoctorId,
    pub doctor_name: String,
}

/// Result of a successful `Program::mark_complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The activity moved to completed. `unlocked` is the activity that became
    /// available because of it, if any.
    Completed { unlocked: Option<ActivityId> },
    /// The activity was already completed; nothing changed.
    AlreadyCompleted,
}

/// Ordered, doctor-assigned sequence of activities for one patient.
///
/// Activities are kept sorted by `order`, which is guaranteed to run `1..=n`
/// without gaps. Lock state and progress are derived on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    id: ProgramId,
    name: String,
    description: String,
    activities: Vec<Activity>,
    assigned_by: AssignedDoctor,
}

impl Program {
    /// Build a program from validated activities.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError` if the name is blank, there are no activities,
    /// ids repeat, or orders are not exactly `1..=n`.
    pub fn new(
        id: ProgramId,
        name: impl Into<String>,
        description: impl Into<String>,
        mut activities: Vec<Activity>,
        assigned_by: AssignedDoctor,
    ) -> Result<Self, ProgramError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ProgramError::EmptyName);
        }
        if activities.is_empty() {
            return Err(ProgramError::Empty);
        }

        let mut seen = HashSet::with_capacity(activities.len());
        for activity in &activities {
            if !seen.insert(activity.id()) {
                return Err(ProgramError::DuplicateActivity(activity.id()));
            }
        }

        activities.sort_by_key(Activity::order);
        let expected_max = u32::try_from(activities.len()).unwrap_or(u32::MAX);
        for (expected, activity) in (1..).zip(&activities) {
            if activity.order() != expected {
                return Err(ProgramError::NonContiguousOrder {
                    expected_max,
                    found: activity.order(),
                });
            }
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            activities,
            assigned_by,
        })
    }

    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn assigned_by(&self) -> &AssignedDoctor {
        &self.assigned_by
    }

    /// Activities sorted by order.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id() == id)
    }

    fn position(&self, id: ActivityId) -> Option<usize> {
        self.activities.iter().position(|a| a.id() == id)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_activities().count()
    }

    pub fn completed_activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter().filter(|a| a.is_completed())
    }

    /// Completion percentage, `round(100 * completed / total)`.
    #[must_use]
    pub fn progress(&self) -> u8 {
        percent(self.completed_count(), self.activities.len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.activities.iter().all(Activity::is_completed)
    }

    /// First activity (by order) that is not completed yet.
    #[must_use]
    pub fn next_activity(&self) -> Option<&Activity> {
        self.activities.iter().find(|a| !a.is_completed())
    }

    fn locked_at(&self, index: usize) -> bool {
        index > 0 && !self.activities[index - 1].is_completed()
    }

    /// Whether the activity is waiting on its predecessor.
    ///
    /// Unknown ids report `false`; use [`Program::status`] to distinguish.
    #[must_use]
    pub fn is_locked(&self, id: ActivityId) -> bool {
        self.position(id).is_some_and(|idx| self.locked_at(idx))
    }

    #[must_use]
    pub fn status(&self, id: ActivityId) -> Option<ActivityStatus> {
        self.position(id).map(|idx| self.status_at(idx))
    }

    fn status_at(&self, index: usize) -> ActivityStatus {
        if self.activities[index].is_completed() {
            ActivityStatus::Completed
        } else if self.locked_at(index) {
            ActivityStatus::Locked
        } else {
            ActivityStatus::Available
        }
    }

    /// Every activity paired with its derived status, in order.
    pub fn statuses(&self) -> impl Iterator<Item = (&Activity, ActivityStatus)> {
        self.activities
            .iter()
            .enumerate()
            .map(|(idx, a)| (a, self.status_at(idx)))
    }

    /// Mark an activity completed.
    ///
    /// Completing an already completed activity is a no-op. On error the
    /// program is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError::UnknownActivity` if the id is not in this program,
    /// or `ProgramError::Locked` if its predecessor is not completed.
    pub fn mark_complete(&mut self, id: ActivityId) -> Result<MarkOutcome, ProgramError> {
        let idx = self
            .position(id)
            .ok_or(ProgramError::UnknownActivity(id))?;

        if self.activities[idx].is_completed() {
            return Ok(MarkOutcome::AlreadyCompleted);
        }
        if self.locked_at(idx) {
            return Err(ProgramError::Locked(id));
        }

        self.activities[idx].mark_completed();
        let unlocked = self
            .activities
            .get(idx + 1)
            .filter(|next| !next.is_completed())
            .map(Activity::id);

        Ok(MarkOutcome::Completed { unlocked })
    }

    /// Value-returning form of [`Program::mark_complete`].
    ///
    /// # Errors
    ///
    /// Same as [`Program::mark_complete`].
    pub fn with_completed(mut self, id: ActivityId) -> Result<Self, ProgramError> {
        self.mark_complete(id)?;
        Ok(self)
    }

    #[must_use]
    pub fn progress_view(&self) -> ProgramProgress {
        let total = self.activities.len();
        let completed = self.completed_count();
        ProgramProgress {
            total,
            completed,
            remaining: total - completed,
            percent: percent(completed, total),
            is_complete: completed == total,
            next_activity: self.next_activity().map(Activity::id),
        }
    }
}

/// Aggregated view of program progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramProgress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percent: u8,
    pub is_complete: bool,
    pub next_activity: Option<ActivityId>,
}

fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total);
    // Integer round-half-up of 100 * part / total.
    let rounded = (200 * part + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::activity::{ActivityDraft, ActivityKind};

    fn activity(id: u64, order: u32, completed: bool) -> Activity {
        ActivityDraft {
            id: ActivityId::new(id),
            title: format!("Activity {id}"),
            description: String::new(),
            kind: ActivityKind::Journal,
            content: String::new(),
            duration_minutes: None,
            order,
            completed,
        }
        .validate()
        .unwrap()
    }

    fn doctor() -> AssignedDoctor {
        AssignedDoctor {
            doctor_id: DoctorId::new(1),
            doctor_name: "Dr. Sarah Johnson".into(),
        }
    }

    fn program_of(n: u64) -> Program {
        let activities = (1..=n)
            .map(|i| activity(i, u32::try_from(i).unwrap(), false))
            .collect();
        Program::new(ProgramId::new(1), "Anxiety Reduction", "", activities, doctor()).unwrap()
    }

    #[test]
    fn five_activities_two_completed() {
        let mut program = program_of(5);
        program.mark_complete(ActivityId::new(1)).unwrap();
        program.mark_complete(ActivityId::new(2)).unwrap();

        assert_eq!(program.progress(), 40);
        assert_eq!(
            program.status(ActivityId::new(3)),
            Some(ActivityStatus::Available)
        );
        assert!(program.is_locked(ActivityId::new(4)));
        assert!(program.is_locked(ActivityId::new(5)));
    }

    #[test]
    fn first_activity_is_never_locked() {
        let program = program_of(3);
        assert!(!program.is_locked(ActivityId::new(1)));
        assert_eq!(
            program.status(ActivityId::new(1)),
            Some(ActivityStatus::Available)
        );
    }

    #[test]
    fn lock_follows_predecessor_completion() {
        let activities = vec![
            activity(1, 1, false),
            activity(2, 2, false),
            activity(3, 3, true),
            activity(4, 4, false),
        ];
        let program =
            Program::new(ProgramId::new(1), "Mixed", "", activities, doctor()).unwrap();

        assert!(program.is_locked(ActivityId::new(2)));
        // Completed but with an incomplete predecessor: still reported completed.
        assert_eq!(
            program.status(ActivityId::new(3)),
            Some(ActivityStatus::Completed)
        );
        assert!(!program.is_locked(ActivityId::new(4)));
    }

    #[test]
    fn mark_complete_reports_unlocked_successor() {
        let mut program = program_of(3);
        let outcome = program.mark_complete(ActivityId::new(1)).unwrap();
        assert_eq!(
            outcome,
            MarkOutcome::Completed {
                unlocked: Some(ActivityId::new(2))
            }
        );

        program.mark_complete(ActivityId::new(2)).unwrap();
        let last = program.mark_complete(ActivityId::new(3)).unwrap();
        assert_eq!(last, MarkOutcome::Completed { unlocked: None });
        assert!(program.is_complete());
        assert_eq!(program.progress(), 100);
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut program = program_of(2);
        program.mark_complete(ActivityId::new(1)).unwrap();
        let before = program.clone();

        let outcome = program.mark_complete(ActivityId::new(1)).unwrap();
        assert_eq!(outcome, MarkOutcome::AlreadyCompleted);
        assert_eq!(program, before);
    }

    #[test]
    fn unknown_activity_is_reported_and_ignored() {
        let mut program = program_of(2);
        let before = program.clone();

        let err = program.mark_complete(ActivityId::new(99)).unwrap_err();
        assert_eq!(err, ProgramError::UnknownActivity(ActivityId::new(99)));
        assert_eq!(program, before);
    }

    #[test]
    fn locked_activity_cannot_be_completed() {
        let mut program = program_of(3);
        let err = program.mark_complete(ActivityId::new(3)).unwrap_err();
        assert_eq!(err, ProgramError::Locked(ActivityId::new(3)));
        assert_eq!(program.completed_count(), 0);
    }

    #[test]
    fn with_completed_returns_updated_program() {
        let program = program_of(4).with_completed(ActivityId::new(1)).unwrap();
        assert_eq!(program.progress(), 25);
    }

    #[test]
    fn progress_rounds_to_nearest() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 7), 0);
        assert_eq!(percent(7, 7), 100);
    }

    #[test]
    fn progress_stays_within_bounds() {
        for total in 1..=40 {
            for done in 0..=total {
                let p = percent(done, total);
                assert!(p <= 100);
            }
        }
    }

    #[test]
    fn activities_are_sorted_by_order() {
        let activities = vec![activity(3, 3, false), activity(1, 1, false), activity(2, 2, false)];
        let program =
            Program::new(ProgramId::new(1), "Sorted", "", activities, doctor()).unwrap();
        let ids: Vec<u64> = program.activities().iter().map(|a| a.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn gaps_in_order_are_rejected() {
        let activities = vec![activity(1, 1, false), activity(2, 3, false)];
        let err = Program::new(ProgramId::new(1), "Gappy", "", activities, doctor()).unwrap_err();
        assert_eq!(
            err,
            ProgramError::NonContiguousOrder {
                expected_max: 2,
                found: 3
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let activities = vec![activity(1, 1, false), activity(1, 2, false)];
        let err = Program::new(ProgramId::new(1), "Dupes", "", activities, doctor()).unwrap_err();
        assert_eq!(err, ProgramError::DuplicateActivity(ActivityId::new(1)));
    }

    #[test]
    fn empty_program_is_rejected() {
        let err = Program::new(ProgramId::new(1), "Nothing", "", Vec::new(), doctor()).unwrap_err();
        assert_eq!(err, ProgramError::Empty);
    }

    #[test]
    fn progress_view_tracks_next_activity() {
        let mut program = program_of(5);
        program.mark_complete(ActivityId::new(1)).unwrap();
        let view = program.progress_view();
        assert_eq!(view.total, 5);
        assert_eq!(view.completed, 1);
        assert_eq!(view.remaining, 4);
        assert_eq!(view.percent, 20);
        assert!(!view.is_complete);
        assert_eq!(view.next_activity, Some(ActivityId::new(2)));
    }
}
