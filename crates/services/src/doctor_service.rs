use std::sync::Arc;

use hopelink_core::model::{Doctor, DoctorId};
use storage::repository::DoctorRepository;
use tracing::{debug, info, warn};

use crate::error::DoctorServiceError;

/// Doctor directory: search and connection invitations.
#[derive(Clone)]
pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
}

impl DoctorService {
    #[must_use]
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    /// # Errors
    ///
    /// Returns `DoctorServiceError::Storage` on repository failures.
    pub async fn list(&self) -> Result<Vec<Doctor>, DoctorServiceError> {
        Ok(self.doctors.list_doctors().await?)
    }

    /// Doctors whose name or speciality contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `DoctorServiceError::Storage` on repository failures.
    pub async fn search(&self, query: &str) -> Result<Vec<Doctor>, DoctorServiceError> {
        let doctors = self.list().await?;
        let hits: Vec<Doctor> = doctors.into_iter().filter(|d| d.matches(query)).collect();
        debug!(query, hits = hits.len(), "doctor search");
        Ok(hits)
    }

    /// Send a connection request and persist the pending status.
    ///
    /// # Errors
    ///
    /// Returns `DoctorServiceError::Invitation` if a request is already pending
    /// or accepted, and `DoctorServiceError::Storage` if the doctor is unknown.
    pub async fn send_invitation(&self, id: DoctorId) -> Result<Doctor, DoctorServiceError> {
        let mut doctor = self.doctors.get_doctor(id).await?;
        doctor.send_invitation().inspect_err(|err| {
            warn!(doctor = %id, %err, "invitation rejected");
        })?;
        self.doctors.upsert_doctor(&doctor).await?;
        info!(doctor = %id, name = %doctor.name, "invitation sent");
        Ok(doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopelink_core::model::{InvitationError, InvitationStatus};
    use hopelink_core::time::fixed_now;
    use storage::{InMemoryRepository, MockDataset, StorageError};

    fn service() -> DoctorService {
        let repo =
            InMemoryRepository::seeded(MockDataset::generate(fixed_now(), 1).unwrap()).unwrap();
        DoctorService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_name_and_speciality() {
        let svc = service();
        let by_name = svc.search("CHEN").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, DoctorId::new(2));

        let by_speciality = svc.search("therapy").await.unwrap();
        let ids: Vec<u64> = by_speciality.iter().map(|d| d.id.value()).collect();
        assert_eq!(ids, vec![1, 3, 5]);

        assert_eq!(svc.search("  ").await.unwrap().len(), 5);
        assert!(svc.search("cardiology").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invitation_is_persisted_once() {
        let svc = service();
        let doctor = svc.send_invitation(DoctorId::new(2)).await.unwrap();
        assert_eq!(doctor.invitation, InvitationStatus::Pending);

        let stored = svc.list().await.unwrap();
        assert_eq!(stored[1].invitation, InvitationStatus::Pending);

        let err = svc.send_invitation(DoctorId::new(2)).await.unwrap_err();
        assert!(matches!(
            err,
            DoctorServiceError::Invitation(InvitationError::AlreadyPending(_))
        ));
    }

    #[tokio::test]
    async fn connected_doctor_cannot_be_invited() {
        let err = service()
            .send_invitation(DoctorId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DoctorServiceError::Invitation(InvitationError::AlreadyConnected(_))
        ));
    }

    #[tokio::test]
    async fn unknown_doctor_is_not_found() {
        let err = service()
            .send_invitation(DoctorId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DoctorServiceError::Storage(StorageError::NotFound)
        ));
    }
}
