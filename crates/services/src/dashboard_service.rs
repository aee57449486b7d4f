//! Read-only views assembled for the dashboard and progress pages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hopelink_core::model::{
    ActivityId, ActivityKind, ActivityStatus, AiFeedback, DailyMotivation, HeartRateSummary,
    Program, ProgramId, ProgramProgress, SuggestedActivity, UserId,
};
use serde::Serialize;
use storage::repository::{InsightsRepository, ProfileRepository, ProgramRepository};
use storage::{Storage, StorageError};
use tracing::debug;

use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientSummary {
    pub id: UserId,
    pub name: String,
    pub initials: String,
    pub assigned_doctor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub id: ActivityId,
    pub title: String,
    pub kind: ActivityKind,
    pub duration_minutes: Option<u32>,
    pub status: ActivityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSummary {
    pub id: ProgramId,
    pub name: String,
    pub assigned_by: String,
    pub progress: ProgramProgress,
    pub next_activity: Option<ActivitySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub connected: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Everything the dashboard home page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub patient: PatientSummary,
    pub program: Option<ProgramSummary>,
    pub motivation: Option<DailyMotivation>,
    pub suggested: Option<SuggestedActivity>,
    pub heart_rate: Option<HeartRateSummary>,
    pub device: Option<DeviceStatus>,
    pub feedback: Option<AiFeedback>,
}

/// Progress page: per-activity status plus telemetry summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub program: Option<ProgramSummary>,
    pub activities: Vec<ActivitySummary>,
    pub heart_rate: Option<HeartRateSummary>,
    /// Mean accelerometer magnitude over the sampled window.
    pub mean_motion: Option<f64>,
    pub feedback: Option<AiFeedback>,
}

#[derive(Clone)]
pub struct DashboardService {
    programs: Arc<dyn ProgramRepository>,
    profiles: Arc<dyn ProfileRepository>,
    insights: Arc<dyn InsightsRepository>,
}

/// Missing feeds render as empty cards rather than failing the page.
fn optional<T>(result: Result<T, StorageError>) -> Result<Option<T>, DashboardError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn activity_summary(program: &Program, id: ActivityId) -> Option<ActivitySummary> {
    let activity = program.activity(id)?;
    Some(ActivitySummary {
        id,
        title: activity.title().to_string(),
        kind: activity.kind(),
        duration_minutes: activity.effective_duration_minutes(),
        status: program.status(id)?,
    })
}

fn program_summary(program: &Program) -> ProgramSummary {
    let progress = program.progress_view();
    ProgramSummary {
        id: program.id(),
        name: program.name().to_string(),
        assigned_by: program.assigned_by().doctor_name.clone(),
        next_activity: progress
            .next_activity
            .and_then(|id| activity_summary(program, id)),
        progress,
    }
}

impl DashboardService {
    #[must_use]
    pub fn new(
        programs: Arc<dyn ProgramRepository>,
        profiles: Arc<dyn ProfileRepository>,
        insights: Arc<dyn InsightsRepository>,
    ) -> Self {
        Self {
            programs,
            profiles,
            insights,
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            Arc::clone(&storage.programs),
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.insights),
        )
    }

    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if the profile is missing or a
    /// repository fails. Missing feeds and programs are reported as `None`.
    pub async fn snapshot(&self, user: UserId) -> Result<DashboardSnapshot, DashboardError> {
        let profile = self.profiles.get_profile(user).await?;
        let program = self.programs.assigned_program(user).await?;
        let health = optional(self.insights.health_data(user).await)?;

        let snapshot = DashboardSnapshot {
            patient: PatientSummary {
                id: profile.id,
                initials: profile.initials(),
                assigned_doctor: profile.assigned_doctor.as_ref().map(|d| d.name.clone()),
                name: profile.name,
            },
            program: program.as_ref().map(program_summary),
            motivation: optional(self.insights.daily_motivation().await)?,
            suggested: optional(self.insights.suggested_activity().await)?,
            heart_rate: health.as_ref().and_then(|h| h.heart_rate_summary()),
            device: health.as_ref().map(|h| DeviceStatus {
                connected: h.device_connected,
                last_sync: h.last_sync,
            }),
            feedback: optional(self.insights.ai_feedback(user).await)?,
        };
        debug!(user = %user, has_program = snapshot.program.is_some(), "dashboard snapshot built");
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Returns `DashboardError::Storage` on repository failures.
    pub async fn progress_report(&self, user: UserId) -> Result<ProgressReport, DashboardError> {
        let program = self.programs.assigned_program(user).await?;
        let health = optional(self.insights.health_data(user).await)?;

        let activities = program
            .as_ref()
            .map(|p| {
                p.statuses()
                    .map(|(activity, status)| ActivitySummary {
                        id: activity.id(),
                        title: activity.title().to_string(),
                        kind: activity.kind(),
                        duration_minutes: activity.effective_duration_minutes(),
                        status,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mean_motion = health.as_ref().and_then(|h| {
            let magnitudes = h.accelerometer.magnitudes();
            if magnitudes.is_empty() {
                return None;
            }
            #[allow(clippy::cast_precision_loss)]
            let mean = magnitudes.iter().map(|s| s.value).sum::<f64>() / magnitudes.len() as f64;
            Some(mean)
        });

        Ok(ProgressReport {
            program: program.as_ref().map(program_summary),
            activities,
            heart_rate: health.as_ref().and_then(|h| h.heart_rate_summary()),
            mean_motion,
            feedback: optional(self.insights.ai_feedback(user).await)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopelink_core::time::fixed_now;
    use storage::{InMemoryRepository, MockDataset};

    fn service() -> DashboardService {
        let storage = Storage::mock(MockDataset::generate(fixed_now(), 5).unwrap()).unwrap();
        DashboardService::from_storage(&storage)
    }

    #[tokio::test]
    async fn snapshot_collects_every_card() {
        let snapshot = service().snapshot(UserId::new(1)).await.unwrap();
        assert_eq!(snapshot.patient.name, "Alex Morgan");
        assert_eq!(snapshot.patient.initials, "AL");
        assert_eq!(
            snapshot.patient.assigned_doctor.as_deref(),
            Some("Dr. Sarah Johnson")
        );

        let program = snapshot.program.unwrap();
        assert_eq!(program.progress.percent, 40);
        let next = program.next_activity.unwrap();
        assert_eq!(next.title, "Reflection Journal");
        assert_eq!(next.status, ActivityStatus::Available);

        assert_eq!(snapshot.motivation.unwrap().author, "Dan Millman");
        assert_eq!(snapshot.suggested.unwrap().kind, ActivityKind::Breathing);
        assert!(snapshot.device.unwrap().connected);
        let hr = snapshot.heart_rate.unwrap();
        assert!(hr.min >= 65.0 && hr.max < 85.0);
        assert_eq!(snapshot.feedback.unwrap().improvements.len(), 3);
    }

    #[tokio::test]
    async fn progress_report_lists_statuses_in_order() {
        let report = service().progress_report(UserId::new(1)).await.unwrap();
        let statuses: Vec<ActivityStatus> = report.activities.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                ActivityStatus::Completed,
                ActivityStatus::Completed,
                ActivityStatus::Available,
                ActivityStatus::Locked,
                ActivityStatus::Locked,
            ]
        );
        assert!(report.mean_motion.is_some());
    }

    #[tokio::test]
    async fn missing_feeds_render_empty() {
        let repo = InMemoryRepository::new();
        let storage = Storage::from_repository(repo);
        let svc = DashboardService::from_storage(&storage);
        assert!(matches!(
            svc.snapshot(UserId::new(1)).await,
            Err(DashboardError::Storage(StorageError::NotFound))
        ));

        let report = svc.progress_report(UserId::new(1)).await.unwrap();
        assert!(report.program.is_none());
        assert!(report.activities.is_empty());
        assert!(report.heart_rate.is_none());
    }
}
