use thiserror::Error;

use crate::model::{
    ActivityError, InvitationError, JournalError, PasswordError, ProfileError, ProgramError,
    SettingsError,
};
use crate::timer::TimerError;

/// Any domain rule violation raised by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Invitation(#[from] InvitationError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Timer(#[from] TimerError),
}
