mod activity;
mod doctor;
mod health;
mod ids;
mod journal;
mod password;
mod profile;
mod program;
mod settings;

pub use activity::{
    Activity, ActivityDraft, ActivityError, ActivityKind, ActivityStatus, CompletionMode,
    DEFAULT_BREATHING_MINUTES, DEFAULT_WALK_MINUTES,
};
pub use doctor::{Doctor, InvitationError, InvitationStatus, initials};
pub use health::{
    AiFeedback, DailyMotivation, HealthData, HeartRateSummary, Improvement, Sample,
    SuggestedActivity, Trend, TriAxis,
};
pub use ids::{ActivityId, DoctorId, JournalEntryId, ParseIdError, ProgramId, UserId};
pub use journal::{DEFAULT_MIN_JOURNAL_CHARS, JournalDraft, JournalEntry, JournalError};
pub use password::{
    DEFAULT_MIN_STRENGTH, PasswordChange, PasswordError, PasswordField, PasswordRequirement,
    StrengthLevel, password_strength, requirements as password_requirements,
};
pub use profile::{
    AssignedDoctorRef, ProfileError, ProfileUpdate, UserProfile, ValidatedProfileUpdate,
};
pub use program::{AssignedDoctor, MarkOutcome, Program, ProgramError, ProgramProgress};
pub use settings::{ActivitySettings, ActivitySettingsDraft, SettingsError};
