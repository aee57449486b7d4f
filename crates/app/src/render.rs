//! Plain-text rendering for terminal output.

use hopelink_core::model::{
    ActivityKind, ActivityStatus, Doctor, InvitationStatus, Program, ProgramProgress, UserProfile,
};
use services::dashboard_service::{ActivitySummary, ProgramSummary};
use services::{DashboardSnapshot, PasswordAssessment, ProgressReport};

fn status_mark(status: ActivityStatus) -> &'static str {
    match status {
        ActivityStatus::Completed => "[x]",
        ActivityStatus::Available => "[ ]",
        ActivityStatus::Locked => "[-]",
    }
}

fn activity_line(summary: &ActivitySummary) -> String {
    let duration = summary
        .duration_minutes
        .map(|m| format!(" ({m} min)"))
        .unwrap_or_default();
    format!(
        "{} {:<6} {:<10} {}{}",
        status_mark(summary.status),
        summary.id.label(),
        summary.kind.label(),
        summary.title,
        duration
    )
}

pub fn progress_line(progress: &ProgramProgress) -> String {
    format!(
        "{}% complete ({}/{} activities, {} remaining)",
        progress.percent, progress.completed, progress.total, progress.remaining
    )
}

fn program_summary(out: &mut Vec<String>, summary: &ProgramSummary) {
    out.push(format!("{} (assigned by {})", summary.name, summary.assigned_by));
    out.push(format!("  {}", progress_line(&summary.progress)));
    match &summary.next_activity {
        Some(next) => out.push(format!("  Next: {}", activity_line(next))),
        None => out.push("  All activities completed".into()),
    }
}

pub fn dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = vec![format!(
        "Welcome back, {} [{}]",
        snapshot.patient.name, snapshot.patient.initials
    )];
    if let Some(doctor) = &snapshot.patient.assigned_doctor {
        out.push(format!("Your doctor: {doctor}"));
    }
    out.push(String::new());

    match &snapshot.program {
        Some(program) => program_summary(&mut out, program),
        None => out.push("No program assigned yet".into()),
    }

    if let Some(quote) = &snapshot.motivation {
        out.push(String::new());
        out.push(format!("\"{}\" - {}", quote.quote, quote.author));
    }
    if let Some(suggested) = &snapshot.suggested {
        out.push(format!(
            "Suggested: {} ({} min, {})",
            suggested.title,
            suggested.duration_minutes,
            suggested.kind.label()
        ));
    }
    if let Some(hr) = &snapshot.heart_rate {
        out.push(format!(
            "Heart rate: {:.0} bpm now, {:.0}-{:.0} over 24h (avg {:.1})",
            hr.latest.value, hr.min, hr.max, hr.average
        ));
    }
    if let Some(device) = &snapshot.device {
        let state = if device.connected {
            "connected"
        } else {
            "disconnected"
        };
        let sync = device
            .last_sync
            .map(|at| format!(", last sync {}", at.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();
        out.push(format!("Device: {state}{sync}"));
    }
    if let Some(feedback) = &snapshot.feedback {
        out.push(String::new());
        out.push(feedback.summary.clone());
    }
    out.join("\n")
}

/// Program overview. `kind` narrows the activity list to one activity type.
pub fn program(program: &Program, kind: Option<ActivityKind>) -> String {
    let mut out = vec![
        program.name().to_string(),
        program.description().to_string(),
        format!("Assigned by {}", program.assigned_by().doctor_name),
        progress_line(&program.progress_view()),
        String::new(),
    ];
    for (activity, status) in program
        .statuses()
        .filter(|(activity, _)| kind.is_none_or(|k| activity.kind() == k))
    {
        out.push(activity_line(&ActivitySummary {
            id: activity.id(),
            title: activity.title().to_string(),
            kind: activity.kind(),
            duration_minutes: activity.effective_duration_minutes(),
            status,
        }));
    }

    let done: Vec<&str> = program.completed_activities().map(|a| a.title()).collect();
    if !done.is_empty() {
        out.push(String::new());
        out.push(format!("Done so far: {}", done.join(", ")));
    }
    out.join("\n")
}

pub fn progress(report: &ProgressReport) -> String {
    let mut out = Vec::new();
    match &report.program {
        Some(program) => program_summary(&mut out, program),
        None => out.push("No program assigned yet".into()),
    }
    out.extend(report.activities.iter().map(activity_line));
    if let Some(hr) = &report.heart_rate {
        out.push(format!(
            "Heart rate: min {:.0}, max {:.0}, avg {:.1}",
            hr.min, hr.max, hr.average
        ));
    }
    if let Some(motion) = report.mean_motion {
        out.push(format!("Mean motion: {motion:.2} g"));
    }
    if let Some(feedback) = &report.feedback {
        out.push(String::new());
        out.push(feedback.summary.clone());
        for improvement in &feedback.improvements {
            out.push(format!(
                "  {:<24} {}",
                improvement.metric,
                improvement.signed_label()
            ));
        }
        for suggestion in &feedback.suggestions {
            out.push(format!("  - {suggestion}"));
        }
    }
    out.join("\n")
}

pub fn doctors(doctors: &[Doctor]) -> String {
    if doctors.is_empty() {
        return "No doctors found".into();
    }
    doctors
        .iter()
        .map(|d| {
            let status = match d.invitation {
                InvitationStatus::None => "",
                InvitationStatus::Pending => " (request sent)",
                InvitationStatus::Accepted => " (connected)",
            };
            format!(
                "{:<6} [{}] {} - {}{}",
                d.id.label(),
                d.initials(),
                d.name,
                d.speciality,
                status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn profile(profile: &UserProfile) -> String {
    let mut out = vec![format!("{} [{}]", profile.name, profile.initials())];
    if let Some(age) = profile.age {
        out.push(format!("Age: {age}"));
    }
    if let Some(background) = &profile.background {
        out.push(format!("Background: {background}"));
    }
    if let Some(doctor) = &profile.assigned_doctor {
        out.push(format!("Doctor: {} ({})", doctor.name, doctor.id.label()));
    }
    out.join("\n")
}

pub fn password(assessment: &PasswordAssessment) -> String {
    let mut out = vec![format!(
        "Strength: {:?} ({}/100)",
        assessment.level, assessment.score
    )];
    for req in &assessment.requirements {
        let mark = if req.met { "[x]" } else { "[ ]" };
        out.push(format!("  {mark} {}", req.text));
    }
    out.join("\n")
}
