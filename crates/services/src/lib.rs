#![forbid(unsafe_code)]

pub mod activities;
pub mod app_services;
pub mod dashboard_service;
pub mod doctor_service;
pub mod error;
pub mod profile_service;
pub mod program_service;

pub use hopelink_core::Clock;

pub use activities::{ActivityPlayer, ActivityRunner, DriveEnd, drive, drive_every};
pub use app_services::AppServices;
pub use dashboard_service::{DashboardService, DashboardSnapshot, ProgressReport};
pub use doctor_service::DoctorService;
pub use error::{
    ActivityRunError, AppServicesError, DashboardError, DoctorServiceError, ProfileServiceError,
    ProgramServiceError,
};
pub use profile_service::{PasswordAssessment, ProfileService};
pub use program_service::{CompletionResult, ProgramService};
