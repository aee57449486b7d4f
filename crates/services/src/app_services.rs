use std::sync::Arc;

use hopelink_core::model::{ActivitySettings, UserId};
use storage::{MockDataset, Storage};
use tracing::info;

use crate::Clock;
use crate::activities::ActivityRunner;
use crate::dashboard_service::DashboardService;
use crate::doctor_service::DoctorService;
use crate::error::AppServicesError;
use crate::profile_service::ProfileService;
use crate::program_service::ProgramService;

/// Assembles app-facing services for the signed-in patient.
#[derive(Clone)]
pub struct AppServices {
    user: UserId,
    programs: Arc<ProgramService>,
    runner: Arc<ActivityRunner>,
    doctors: Arc<DoctorService>,
    profiles: Arc<ProfileService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services over the mock dataset, signed in as its patient.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the fixtures fail validation or cannot be
    /// loaded into storage.
    pub fn mock(
        clock: Clock,
        seed: u64,
        settings: ActivitySettings,
    ) -> Result<Self, AppServicesError> {
        let dataset = MockDataset::generate(clock.now(), seed)?;
        let user = dataset.profile.id;
        let storage = Storage::mock(dataset)?;
        info!(seed, user = %user, "mock dataset loaded");
        Ok(Self::from_storage(&storage, clock, settings, user))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        settings: ActivitySettings,
        user: UserId,
    ) -> Self {
        let programs = ProgramService::new(
            clock,
            Arc::clone(&storage.programs),
            Arc::clone(&storage.journals),
        )
        .with_settings(settings.clone());
        let runner = ActivityRunner::new(programs.clone());
        let profiles =
            ProfileService::new(Arc::clone(&storage.profiles)).with_settings(settings);

        Self {
            user,
            programs: Arc::new(programs),
            runner: Arc::new(runner),
            doctors: Arc::new(DoctorService::new(Arc::clone(&storage.doctors))),
            profiles: Arc::new(profiles),
            dashboard: Arc::new(DashboardService::from_storage(storage)),
        }
    }

    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    #[must_use]
    pub fn programs(&self) -> Arc<ProgramService> {
        Arc::clone(&self.programs)
    }

    #[must_use]
    pub fn runner(&self) -> Arc<ActivityRunner> {
        Arc::clone(&self.runner)
    }

    #[must_use]
    pub fn doctors(&self) -> Arc<DoctorService> {
        Arc::clone(&self.doctors)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
