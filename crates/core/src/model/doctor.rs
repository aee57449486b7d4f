use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::DoctorId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvitationError {
    #[error("an invitation to {0} is already pending")]
    AlreadyPending(DoctorId),

    #[error("already connected with {0}")]
    AlreadyConnected(DoctorId),
}

/// Connection state between the patient and a doctor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    None,
    Pending,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub speciality: String,
    pub image_url: String,
    #[serde(default)]
    pub invitation: InvitationStatus,
}

impl Doctor {
    /// Case-insensitive substring match on name or speciality.
    ///
    /// A blank query matches every doctor.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.speciality.to_lowercase().contains(&needle)
    }

    /// Move the invitation from `None` to `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `InvitationError` if an invitation is already pending or accepted.
    pub fn send_invitation(&mut self) -> Result<(), InvitationError> {
        match self.invitation {
            InvitationStatus::None => {
                self.invitation = InvitationStatus::Pending;
                Ok(())
            }
            InvitationStatus::Pending => Err(InvitationError::AlreadyPending(self.id)),
            InvitationStatus::Accepted => Err(InvitationError::AlreadyConnected(self.id)),
        }
    }

    #[must_use]
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// First two characters of a display name, uppercased.
#[must_use]
pub fn initials(name: &str) -> String {
    name.trim().chars().take(2).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(status: InvitationStatus) -> Doctor {
        Doctor {
            id: DoctorId::new(2),
            name: "Dr. Michael Chen".into(),
            speciality: "Anxiety & Depression Specialist".into(),
            image_url: "/placeholder.svg".into(),
            invitation: status,
        }
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_speciality() {
        let d = doctor(InvitationStatus::None);
        assert!(d.matches("chen"));
        assert!(d.matches("DEPRESSION"));
        assert!(d.matches("  "));
        assert!(!d.matches("trauma"));
    }

    #[test]
    fn invitation_moves_to_pending_once() {
        let mut d = doctor(InvitationStatus::None);
        d.send_invitation().unwrap();
        assert_eq!(d.invitation, InvitationStatus::Pending);
        assert_eq!(
            d.send_invitation().unwrap_err(),
            InvitationError::AlreadyPending(DoctorId::new(2))
        );
    }

    #[test]
    fn accepted_doctor_cannot_be_invited() {
        let mut d = doctor(InvitationStatus::Accepted);
        assert!(matches!(
            d.send_invitation(),
            Err(InvitationError::AlreadyConnected(_))
        ));
        assert_eq!(d.invitation, InvitationStatus::Accepted);
    }

    #[test]
    fn initials_take_first_two_chars() {
        assert_eq!(doctor(InvitationStatus::None).initials(), "DR");
        assert_eq!(initials("alex morgan"), "AL");
    }
}
