//! Shared error types for the services crate.

use thiserror::Error;

use hopelink_core::model::{
    ActivityId, ActivityKind, InvitationError, JournalError, PasswordError, ProfileError,
    ProgramError, UserId,
};
use storage::{FixtureError, StorageError};

/// Errors emitted by `ProgramService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgramServiceError {
    #[error("no program assigned to user {0}")]
    NoProgram(UserId),
    #[error("activity {activity} is a {found:?} activity, expected {expected:?}")]
    WrongActivityKind {
        activity: ActivityId,
        expected: ActivityKind,
        found: ActivityKind,
    },
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ActivityRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityRunError {
    #[error("activity {0} is not part of this program")]
    UnknownActivity(ActivityId),
    #[error("activity {0} is locked until the previous activity is completed")]
    Locked(ActivityId),
    #[error("finish the timer for activity {0} before completing it")]
    TimerNotCompleted(ActivityId),
    #[error("journal activity {0} needs an entry to complete")]
    MissingJournal(ActivityId),
    #[error(transparent)]
    Program(#[from] ProgramServiceError),
}

/// Errors emitted by `DoctorService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DoctorServiceError {
    #[error(transparent)]
    Invitation(#[from] InvitationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while assembling dashboard views.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while assembling `AppServices`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
