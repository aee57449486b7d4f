use serde::Serialize;
use thiserror::Error;

use crate::model::doctor::initials;
use crate::model::ids::{DoctorId, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("age must be a whole number between 1 and 120, got {raw:?}")]
    InvalidAge { raw: String },

    #[error("invalid email address: {raw}")]
    InvalidEmail { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedDoctorRef {
    pub id: DoctorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub image_url: String,
    pub age: Option<u8>,
    pub background: Option<String>,
    pub assigned_doctor: Option<AssignedDoctorRef>,
}

impl UserProfile {
    #[must_use]
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    /// Split the stored name the way the profile form pre-fills it.
    #[must_use]
    pub fn name_parts(&self) -> (String, String) {
        let mut parts = self.name.split_whitespace();
        let first = parts.next().unwrap_or_default().to_string();
        let last = parts.next().unwrap_or_default().to_string();
        (first, last)
    }

    /// Apply a validated update. Only the name and age are stored.
    pub fn apply(&mut self, update: ValidatedProfileUpdate) {
        self.name = update.name;
        self.age = update.age;
    }
}

/// Raw form input for a profile update.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProfileUpdate {
    name: String,
    age: Option<u8>,
}

impl ValidatedProfileUpdate {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn age(&self) -> Option<u8> {
        self.age
    }
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns `ProfileError` for a blank name, an out-of-range age, or a
    /// malformed email.
    pub fn validate(self) -> Result<ValidatedProfileUpdate, ProfileError> {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }

        let age = match self.age.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<u8>() {
                Ok(age) if (1..=120).contains(&age) => Some(age),
                _ => {
                    return Err(ProfileError::InvalidAge {
                        raw: raw.to_string(),
                    });
                }
            },
        };

        if let Some(email) = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            if !looks_like_email(email) {
                return Err(ProfileError::InvalidEmail {
                    raw: email.to_string(),
                });
            }
        }

        Ok(ValidatedProfileUpdate { name, age })
    }
}

fn looks_like_email(raw: &str) -> bool {
    let mut parts = raw.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !raw.contains(char::is_whitespace)
        }
        _ => false,
    }
}
