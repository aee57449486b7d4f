use std::sync::Arc;

use hopelink_core::model::{
    ActivitySettings, PasswordChange, PasswordRequirement, ProfileUpdate, StrengthLevel, UserId,
    UserProfile, password_requirements, password_strength,
};
use serde::Serialize;
use storage::repository::ProfileRepository;
use tracing::{debug, info, warn};

use crate::error::ProfileServiceError;

/// Live feedback for a password being typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordAssessment {
    pub score: u8,
    pub level: StrengthLevel,
    pub requirements: Vec<PasswordRequirement>,
}

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    settings: ActivitySettings,
}

impl ProfileService {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            profiles,
            settings: ActivitySettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ActivitySettings) -> Self {
        self.settings = settings;
        self
    }

    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if the profile cannot be loaded.
    pub async fn load(&self, user: UserId) -> Result<UserProfile, ProfileServiceError> {
        debug!(user = %user, "loading profile");
        Ok(self.profiles.get_profile(user).await?)
    }

    /// Validate the form and store the new name and age.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Profile` for invalid input; the stored
    /// profile is left untouched in that case.
    pub async fn update(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ProfileServiceError> {
        let validated = update.validate().inspect_err(|err| {
            warn!(user = %user, %err, "profile update rejected");
        })?;
        let mut profile = self.load(user).await?;
        profile.apply(validated);
        self.profiles.save_profile(&profile).await?;
        info!(user = %user, "profile updated");
        Ok(profile)
    }

    /// Validate a password change. There is no credential store, so nothing
    /// is persisted.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Password` for missing fields, a mismatched
    /// confirmation or a password below the configured strength.
    pub fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<StrengthLevel, ProfileServiceError> {
        let level = change
            .validate_with(self.settings.password_min_strength())
            .inspect_err(|err| warn!(%err, "password change rejected"))?;
        info!(?level, "password change accepted");
        Ok(level)
    }

    #[must_use]
    pub fn assess_password(&self, password: &str) -> PasswordAssessment {
        let score = password_strength(password);
        PasswordAssessment {
            score,
            level: StrengthLevel::from_score(score),
            requirements: password_requirements(password),
        }
    }
}
