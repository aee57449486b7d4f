//! Mock dataset standing in for the unimplemented backend API.

use chrono::{DateTime, Duration, Utc};
use hopelink_core::model::{
    ActivityDraft, ActivityError, ActivityId, ActivityKind, AiFeedback, AssignedDoctor,
    AssignedDoctorRef, DailyMotivation, Doctor, DoctorId, HealthData, Improvement,
    InvitationStatus, Program, ProgramError, ProgramId, Sample, SuggestedActivity, Trend, TriAxis,
    UserId, UserProfile,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Number of hourly telemetry samples generated per series.
pub const SAMPLE_HOURS: i64 = 24;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FixtureError {
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error(transparent)]
    Program(#[from] ProgramError),
}

/// Everything the dashboard reads, generated in one go.
#[derive(Debug, Clone)]
pub struct MockDataset {
    pub doctors: Vec<Doctor>,
    pub program: Program,
    pub profile: UserProfile,
    pub health: HealthData,
    pub feedback: AiFeedback,
    pub motivation: DailyMotivation,
    pub suggested: SuggestedActivity,
}

impl MockDataset {
    /// Build the dataset. Telemetry is random but reproducible for a given `seed`.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if a fixture fails domain validation.
    pub fn generate(now: DateTime<Utc>, seed: u64) -> Result<Self, FixtureError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(Self {
            doctors: doctors(),
            program: program()?,
            profile: profile(),
            health: health(now, &mut rng),
            feedback: feedback(),
            motivation: DailyMotivation {
                quote: "You don't have to control your thoughts. You just have to stop letting them control you.".into(),
                author: "Dan Millman".into(),
            },
            suggested: SuggestedActivity {
                title: "Mindful Breathing".into(),
                description: "Take 5 minutes to focus on your breath and clear your mind.".into(),
                kind: ActivityKind::Breathing,
                duration_minutes: 5,
            },
        })
    }
}

fn doctor(id: u64, name: &str, speciality: &str, invitation: InvitationStatus) -> Doctor {
    Doctor {
        id: DoctorId::new(id),
        name: name.into(),
        speciality: speciality.into(),
        image_url: "/placeholder.svg".into(),
        invitation,
    }
}

fn doctors() -> Vec<Doctor> {
    vec![
        doctor(1, "Dr. Sarah Johnson", "Cognitive Behavioral Therapy", InvitationStatus::Accepted),
        doctor(2, "Dr. Michael Chen", "Anxiety & Depression Specialist", InvitationStatus::None),
        doctor(3, "Dr. Amara Patel", "Trauma-Informed Therapy", InvitationStatus::Pending),
        doctor(4, "Dr. James Wilson", "Mindfulness & Stress Reduction", InvitationStatus::None),
        doctor(5, "Dr. Elena Rodriguez", "Family & Relationship Therapy", InvitationStatus::None),
    ]
}

fn program() -> Result<Program, FixtureError> {
    let drafts = [
        (
            "Introduction to Mindfulness",
            "Understanding the basics of mindfulness and its benefits for anxiety management.",
            ActivityKind::Video,
            "https://www.youtube.com/embed/ZToicYcHIOU",
            None,
            true,
        ),
        (
            "Guided Relaxation",
            "A 10-minute guided relaxation session to practice deep breathing and body awareness.",
            ActivityKind::Audio,
            "https://example.com/relaxation.mp3",
            Some(10),
            true,
        ),
        (
            "Reflection Journal",
            "Record your thoughts and feelings about situations that trigger anxiety.",
            ActivityKind::Journal,
            "",
            None,
            false,
        ),
        (
            "Mindful Walking Exercise",
            "A 15-minute walking meditation to practice mindfulness in movement.",
            ActivityKind::Walk,
            "",
            Some(15),
            false,
        ),
        (
            "Box Breathing Technique",
            "Learn and practice the box breathing technique to manage acute anxiety symptoms.",
            ActivityKind::Breathing,
            "",
            Some(5),
            false,
        ),
    ];

    let activities = (1_u32..)
        .zip(drafts)
        .map(|(order, (title, description, kind, content, duration, completed))| {
            ActivityDraft {
                id: ActivityId::new(u64::from(order)),
                title: title.into(),
                description: description.into(),
                kind,
                content: content.into(),
                duration_minutes: duration,
                order,
                completed,
            }
            .validate()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Program::new(
        ProgramId::new(1),
        "Anxiety Reduction Program",
        "A personalized program designed to help you manage anxiety through mindfulness techniques, cognitive restructuring, and gradual exposure.",
        activities,
        AssignedDoctor {
            doctor_id: DoctorId::new(1),
            doctor_name: "Dr. Sarah Johnson".into(),
        },
    )?)
}

fn profile() -> UserProfile {
    UserProfile {
        id: UserId::new(1),
        name: "Alex Morgan".into(),
        image_url: "/placeholder.svg".into(),
        age: Some(32),
        background: Some("Experiencing anxiety and stress from work".into()),
        assigned_doctor: Some(AssignedDoctorRef {
            id: DoctorId::new(1),
            name: "Dr. Sarah Johnson".into(),
        }),
    }
}

fn hourly(now: DateTime<Utc>, mut value: impl FnMut() -> f64) -> Vec<Sample> {
    (0..SAMPLE_HOURS)
        .map(|i| Sample {
            at: now - Duration::hours(SAMPLE_HOURS - i),
            value: value(),
        })
        .collect()
}

fn axis(now: DateTime<Utc>, rng: &mut StdRng) -> TriAxis {
    TriAxis {
        x: hourly(now, || rng.random_range(-1.0..1.0)),
        y: hourly(now, || rng.random_range(-1.0..1.0)),
        z: hourly(now, || rng.random_range(-1.0..1.0)),
    }
}

fn health(now: DateTime<Utc>, rng: &mut StdRng) -> HealthData {
    let heart_rate = hourly(now, || f64::from(rng.random_range(65_u32..85)));
    let accelerometer = axis(now, rng);
    let gyroscope = axis(now, rng);
    HealthData {
        heart_rate,
        accelerometer,
        gyroscope,
        device_connected: true,
        last_sync: Some(now),
    }
}

fn feedback() -> AiFeedback {
    let improvement = |metric: &str, percentage, direction| Improvement {
        metric: metric.into(),
        percentage,
        direction,
    };
    AiFeedback {
        summary: "Your focus and effort in this activity have improved by 15% this week. The consistency in your breathing exercises is showing positive results.".into(),
        improvements: vec![
            improvement("Focus Duration", 15, Trend::Up),
            improvement("Breathing Consistency", 22, Trend::Up),
            improvement("Stress Levels", 18, Trend::Down),
        ],
        suggestions: vec![
            "Try to practice mindfulness for 5 additional minutes each day".into(),
            "Consider doing your breathing exercises in a quieter environment".into(),
            "Your walking pace is ideal - maintain this rhythm for optimal results".into(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopelink_core::model::ActivityStatus;
    use hopelink_core::time::fixed_now;

    #[test]
    fn program_matches_dashboard_fixture() {
        let data = MockDataset::generate(fixed_now(), 1).unwrap();
        let program = &data.program;
        assert_eq!(program.activities().len(), 5);
        assert_eq!(program.progress(), 40);
        assert_eq!(
            program.status(ActivityId::new(3)),
            Some(ActivityStatus::Available)
        );
        assert!(program.is_locked(ActivityId::new(4)));
    }

    #[test]
    fn telemetry_is_hourly_and_in_range() {
        let now = fixed_now();
        let data = MockDataset::generate(now, 1).unwrap();
        let hr = &data.health.heart_rate;
        assert_eq!(hr.len(), 24);
        assert_eq!(hr[0].at, now - Duration::hours(24));
        assert_eq!(hr[23].at, now - Duration::hours(1));
        assert!(hr.iter().all(|s| (65.0..85.0).contains(&s.value)));
        assert!(
            data.health
                .gyroscope
                .x
                .iter()
                .all(|s| (-1.0..1.0).contains(&s.value))
        );
    }

    #[test]
    fn same_seed_same_telemetry() {
        let a = MockDataset::generate(fixed_now(), 42).unwrap();
        let b = MockDataset::generate(fixed_now(), 42).unwrap();
        assert_eq!(a.health, b.health);
    }
}
