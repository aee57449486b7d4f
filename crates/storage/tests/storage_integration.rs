use std::sync::Arc;

use hopelink_core::model::{ActivityId, DoctorId, InvitationStatus, ProgramId, UserId};
use hopelink_core::time::fixed_now;
use storage::repository::{DoctorRepository, InsightsRepository, ProgramRepository};
use storage::{MockDataset, Storage, StorageError};

fn storage() -> Storage {
    Storage::mock(MockDataset::generate(fixed_now(), 11).expect("fixtures")).expect("storage")
}

#[tokio::test]
async fn handles_share_one_backing_store() {
    let storage = storage();
    let programs = Arc::clone(&storage.programs);

    let mut program = programs
        .get_program(ProgramId::new(1))
        .await
        .expect("program");
    program
        .mark_complete(ActivityId::new(3))
        .expect("activity 3 is available");
    storage.programs.save_program(&program).await.expect("save");

    let assigned = programs
        .assigned_program(UserId::new(1))
        .await
        .expect("lookup")
        .expect("assigned");
    assert_eq!(assigned.progress(), 60);
}

#[tokio::test]
async fn doctor_upsert_replaces_status() {
    let storage = storage();
    let mut doctor = storage
        .doctors
        .get_doctor(DoctorId::new(4))
        .await
        .expect("doctor");
    doctor.send_invitation().expect("no prior invitation");
    storage.doctors.upsert_doctor(&doctor).await.expect("upsert");

    let reloaded = storage
        .doctors
        .get_doctor(DoctorId::new(4))
        .await
        .expect("doctor");
    assert_eq!(reloaded.invitation, InvitationStatus::Pending);
}

#[tokio::test]
async fn insights_are_keyed_by_patient() {
    let storage = storage();
    let health = storage
        .insights
        .health_data(UserId::new(1))
        .await
        .expect("telemetry");
    assert_eq!(health.heart_rate.len(), 24);
    assert_eq!(health.accelerometer.len(), 24);

    assert!(matches!(
        storage.insights.health_data(UserId::new(2)).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn empty_storage_has_no_assignment() {
    let storage = Storage::in_memory();
    assert!(
        storage
            .programs
            .assigned_program(UserId::new(1))
            .await
            .expect("lookup")
            .is_none()
    );
}
