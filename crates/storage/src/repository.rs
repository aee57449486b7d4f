use async_trait::async_trait;
use hopelink_core::model::{
    ActivityId, AiFeedback, DailyMotivation, Doctor, DoctorId, HealthData, JournalEntry, Program,
    ProgramId, SuggestedActivity, UserId, UserProfile,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::fixtures::MockDataset;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Repository contract for therapeutic programs.
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_program(&self, id: ProgramId) -> Result<Program, StorageError>;

    /// Persist or replace a program.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the program cannot be stored.
    async fn save_program(&self, program: &Program) -> Result<(), StorageError>;

    /// Program currently assigned to a patient, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn assigned_program(&self, user: UserId) -> Result<Option<Program>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the program does not exist.
    async fn assign_program(&self, user: UserId, program: ProgramId) -> Result<(), StorageError>;
}

/// Repository contract for the doctor directory.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// All doctors, sorted by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_doctor(&self, id: DoctorId) -> Result<Doctor, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the doctor cannot be stored.
    async fn upsert_doctor(&self, doctor: &Doctor) -> Result<(), StorageError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_profile(&self, id: UserId) -> Result<UserProfile, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;
}

#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an entry with the same id exists.
    async fn append_entry(&self, entry: &JournalEntry) -> Result<(), StorageError>;

    /// Entries written for an activity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn entries_for(&self, activity: ActivityId) -> Result<Vec<JournalEntry>, StorageError>;
}

/// Read-only feeds the dashboard shows next to the program.
#[async_trait]
pub trait InsightsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no telemetry exists for the patient.
    async fn health_data(&self, user: UserId) -> Result<HealthData, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no feedback exists for the patient.
    async fn ai_feedback(&self, user: UserId) -> Result<AiFeedback, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is configured.
    async fn daily_motivation(&self) -> Result<DailyMotivation, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is configured.
    async fn suggested_activity(&self) -> Result<SuggestedActivity, StorageError>;
}

#[derive(Default)]
struct Feeds {
    health: HashMap<UserId, HealthData>,
    feedback: HashMap<UserId, AiFeedback>,
    motivation: Option<DailyMotivation>,
    suggested: Option<SuggestedActivity>,
}

/// Simple in-memory repository used as the dashboard's mock data provider.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    programs: Arc<Mutex<HashMap<ProgramId, Program>>>,
    assignments: Arc<Mutex<HashMap<UserId, ProgramId>>>,
    doctors: Arc<Mutex<HashMap<DoctorId, Doctor>>>,
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    journals: Arc<Mutex<Vec<JournalEntry>>>,
    feeds: Arc<Mutex<Feeds>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with a mock dataset.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if a lock is poisoned.
    pub fn seeded(dataset: MockDataset) -> Result<Self, StorageError> {
        let repo = Self::new();
        let MockDataset {
            doctors,
            program,
            profile,
            health,
            feedback,
            motivation,
            suggested,
        } = dataset;

        lock(&repo.doctors)?.extend(doctors.into_iter().map(|d| (d.id, d)));
        lock(&repo.assignments)?.insert(profile.id, program.id());
        lock(&repo.programs)?.insert(program.id(), program);

        let mut feeds = lock(&repo.feeds)?;
        feeds.health.insert(profile.id, health);
        feeds.feedback.insert(profile.id, feedback);
        feeds.motivation = Some(motivation);
        feeds.suggested = Some(suggested);
        drop(feeds);

        lock(&repo.profiles)?.insert(profile.id, profile);
        Ok(repo)
    }
}

#[async_trait]
impl ProgramRepository for InMemoryRepository {
    async fn get_program(&self, id: ProgramId) -> Result<Program, StorageError> {
        let guard = lock(&self.programs)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn save_program(&self, program: &Program) -> Result<(), StorageError> {
        lock(&self.programs)?.insert(program.id(), program.clone());
        Ok(())
    }

    async fn assigned_program(&self, user: UserId) -> Result<Option<Program>, StorageError> {
        let Some(program_id) = lock(&self.assignments)?.get(&user).copied() else {
            return Ok(None);
        };
        let guard = lock(&self.programs)?;
        Ok(guard.get(&program_id).cloned())
    }

    async fn assign_program(&self, user: UserId, program: ProgramId) -> Result<(), StorageError> {
        if !lock(&self.programs)?.contains_key(&program) {
            return Err(StorageError::NotFound);
        }
        lock(&self.assignments)?.insert(user, program);
        Ok(())
    }
}

#[async_trait]
impl DoctorRepository for InMemoryRepository {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError> {
        let guard = lock(&self.doctors)?;
        let mut doctors: Vec<Doctor> = guard.values().cloned().collect();
        doctors.sort_by_key(|d| d.id);
        Ok(doctors)
    }

    async fn get_doctor(&self, id: DoctorId) -> Result<Doctor, StorageError> {
        let guard = lock(&self.doctors)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn upsert_doctor(&self, doctor: &Doctor) -> Result<(), StorageError> {
        lock(&self.doctors)?.insert(doctor.id, doctor.clone());
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn get_profile(&self, id: UserId) -> Result<UserProfile, StorageError> {
        let guard = lock(&self.profiles)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        lock(&self.profiles)?.insert(profile.id, profile.clone());
        Ok(())
    }
}

#[async_trait]
impl JournalRepository for InMemoryRepository {
    async fn append_entry(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let mut guard = lock(&self.journals)?;
        if guard.iter().any(|e| e.id() == entry.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, activity: ActivityId) -> Result<Vec<JournalEntry>, StorageError> {
        let guard = lock(&self.journals)?;
        Ok(guard
            .iter()
            .filter(|e| e.activity_id() == activity)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InsightsRepository for InMemoryRepository {
    async fn health_data(&self, user: UserId) -> Result<HealthData, StorageError> {
        let guard = lock(&self.feeds)?;
        guard.health.get(&user).cloned().ok_or(StorageError::NotFound)
    }

    async fn ai_feedback(&self, user: UserId) -> Result<AiFeedback, StorageError> {
        let guard = lock(&self.feeds)?;
        guard.feedback.get(&user).cloned().ok_or(StorageError::NotFound)
    }

    async fn daily_motivation(&self) -> Result<DailyMotivation, StorageError> {
        let guard = lock(&self.feeds)?;
        guard.motivation.clone().ok_or(StorageError::NotFound)
    }

    async fn suggested_activity(&self) -> Result<SuggestedActivity, StorageError> {
        let guard = lock(&self.feeds)?;
        guard.suggested.clone().ok_or(StorageError::NotFound)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub programs: Arc<dyn ProgramRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub journals: Arc<dyn JournalRepository>,
    pub insights: Arc<dyn InsightsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Storage backed by the mock dataset.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the dataset cannot be loaded.
    pub fn mock(dataset: MockDataset) -> Result<Self, StorageError> {
        Ok(Self::from_repository(InMemoryRepository::seeded(dataset)?))
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        Self {
            programs: Arc::new(repo.clone()),
            doctors: Arc::new(repo.clone()),
            profiles: Arc::new(repo.clone()),
            journals: Arc::new(repo.clone()),
            insights: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopelink_core::model::{ActivityId, InvitationStatus, JournalDraft};
    use hopelink_core::time::fixed_now;

    fn seeded() -> InMemoryRepository {
        InMemoryRepository::seeded(MockDataset::generate(fixed_now(), 7).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn seeded_repository_assigns_program_to_profile() {
        let repo = seeded();
        let program = repo
            .assigned_program(UserId::new(1))
            .await
            .unwrap()
            .expect("program assigned");
        assert_eq!(program.name(), "Anxiety Reduction Program");
        assert_eq!(program.progress(), 40);
    }

    #[tokio::test]
    async fn program_updates_round_trip() {
        let repo = seeded();
        let mut program = repo.get_program(ProgramId::new(1)).await.unwrap();
        program.mark_complete(ActivityId::new(3)).unwrap();
        repo.save_program(&program).await.unwrap();

        let reloaded = repo.get_program(ProgramId::new(1)).await.unwrap();
        assert_eq!(reloaded.progress(), 60);
    }

    #[tokio::test]
    async fn missing_records_report_not_found() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.get_program(ProgramId::new(9)).await,
            Err(StorageError::NotFound)
        ));
        assert!(repo.assigned_program(UserId::new(1)).await.unwrap().is_none());
        assert!(matches!(
            repo.assign_program(UserId::new(1), ProgramId::new(9)).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            repo.daily_motivation().await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn doctors_are_listed_in_id_order() {
        let repo = seeded();
        let doctors = repo.list_doctors().await.unwrap();
        let ids: Vec<u64> = doctors.iter().map(|d| d.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(doctors[0].invitation, InvitationStatus::Accepted);
    }

    #[tokio::test]
    async fn journal_entries_are_filtered_by_activity() {
        let repo = InMemoryRepository::new();
        let entry = JournalDraft::new(ActivityId::new(3), "Felt anxious before the meeting.")
            .validate(fixed_now())
            .unwrap();
        repo.append_entry(&entry).await.unwrap();
        assert!(matches!(
            repo.append_entry(&entry).await,
            Err(StorageError::Conflict)
        ));

        assert_eq!(repo.entries_for(ActivityId::new(3)).await.unwrap().len(), 1);
        assert!(repo.entries_for(ActivityId::new(4)).await.unwrap().is_empty());
    }
}
