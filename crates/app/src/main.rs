//! `hopelink`: patient dashboard over the mock dataset.

mod config;
mod play;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hopelink_core::model::{ActivityId, ActivityKind, DoctorId, PasswordChange, ProfileUpdate};
use serde::Serialize;
use services::{AppServices, Clock};

use crate::config::{SettingsArgs, init_tracing};

#[derive(Parser)]
#[command(name = "hopelink")]
#[command(about = "Patient dashboard for guided therapy programs", long_about = None)]
struct Cli {
    /// Seed for the mock telemetry
    #[arg(long, env = "HOPELINK_SEED", default_value_t = 7, global = true)]
    seed: u64,

    /// Log filter, e.g. `debug` or `services=trace`
    #[arg(long, env = "HOPELINK_LOG", default_value = "info", global = true)]
    log: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard home page
    Dashboard,
    /// List the assigned program's activities
    Program {
        /// Only show one activity type (video, audio, journal, walk, breathing)
        #[arg(long)]
        kind: Option<ActivityKind>,
    },
    /// Mark activities complete, in the order given
    Complete {
        /// Activity ids such as `act-3` or `3`
        #[arg(required = true)]
        activities: Vec<ActivityId>,
    },
    /// Open an activity and run it to completion
    Play {
        activity: ActivityId,
        /// Entry text for journal activities
        #[arg(long)]
        journal: Option<String>,
        /// Fast-forward factor for timed activities
        #[arg(long, env = "HOPELINK_SPEED", default_value_t = 1.0)]
        speed: f64,
    },
    /// Search the doctor directory
    Doctors {
        /// Matches name or speciality, ignoring case
        query: Option<String>,
    },
    /// Send a connection request to a doctor
    Invite { doctor: DoctorId },
    /// Show per-activity progress and health insights
    Progress,
    /// Show or update the patient profile
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Check a new password, or validate a full change
    Password {
        /// Password to assess or set
        new: String,
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    let settings = cli.settings.resolve()?;
    let app = AppServices::mock(Clock::system(), cli.seed, settings)
        .context("failed to load mock dataset")?;
    let user = app.user();

    match cli.command {
        Commands::Dashboard => {
            let snapshot = app.dashboard().snapshot(user).await?;
            emit(cli.json, &snapshot, render::dashboard)?;
        }
        Commands::Program { kind } => {
            let program = app.programs().assigned(user).await?;
            emit(cli.json, &program, |p| render::program(p, kind))?;
        }
        Commands::Complete { activities } => {
            let programs = app.programs();
            let program_id = programs.assigned(user).await?.id();
            for activity in activities {
                let result = programs.mark_complete(program_id, activity).await?;
                emit(cli.json, &result.progress, |p| {
                    format!("{}: {}", activity.label(), render::progress_line(p))
                })?;
            }
        }
        Commands::Play {
            activity,
            journal,
            speed,
        } => {
            let program_id = app.programs().assigned(user).await?.id();
            let options = play::PlayOptions {
                journal: journal.as_deref(),
                speed,
            };
            if let Some(result) = play::run(&app.runner(), program_id, activity, options).await? {
                emit(cli.json, &result.progress, |p| render::progress_line(p))?;
            }
        }
        Commands::Doctors { query } => {
            let doctors = app
                .doctors()
                .search(query.as_deref().unwrap_or_default())
                .await?;
            emit(cli.json, &doctors, |d| render::doctors(d))?;
        }
        Commands::Invite { doctor } => {
            let doctor = app.doctors().send_invitation(doctor).await?;
            emit(cli.json, &doctor, |d| format!("Request sent to {}", d.name))?;
        }
        Commands::Progress => {
            let report = app.dashboard().progress_report(user).await?;
            emit(cli.json, &report, render::progress)?;
        }
        Commands::Profile {
            first_name,
            last_name,
            age,
            email,
            phone,
        } => {
            let profiles = app.profiles();
            let editing = first_name.is_some()
                || last_name.is_some()
                || age.is_some()
                || email.is_some()
                || phone.is_some();
            let profile = if !editing {
                profiles.load(user).await?
            } else {
                let current = profiles.load(user).await?;
                let (first, last) = current.name_parts();
                let update = ProfileUpdate {
                    first_name: first_name.unwrap_or(first),
                    last_name: last_name.unwrap_or(last),
                    age: age.or_else(|| current.age.map(|a| a.to_string())),
                    email,
                    phone,
                };
                profiles.update(user, update).await?
            };
            emit(cli.json, &profile, render::profile)?;
        }
        Commands::Password {
            new,
            current,
            confirm,
        } => {
            let profiles = app.profiles();
            let assessment = profiles.assess_password(&new);
            emit(cli.json, &assessment, render::password)?;
            if let Some(current) = current {
                let change = PasswordChange {
                    current,
                    confirm: confirm.unwrap_or_else(|| new.clone()),
                    new,
                };
                let level = profiles.change_password(&change)?;
                println!("Password accepted ({level:?})");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_accepts_prefixed_ids() {
        let cli = Cli::try_parse_from(["hopelink", "complete", "act-3", "4"]).unwrap();
        let Commands::Complete { activities } = cli.command else {
            panic!("expected complete");
        };
        assert_eq!(activities, vec![ActivityId::new(3), ActivityId::new(4)]);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["hopelink", "play", "5", "--speed", "30", "--seed", "11"])
            .unwrap();
        assert_eq!(cli.seed, 11);
        let Commands::Play { activity, speed, .. } = cli.command else {
            panic!("expected play");
        };
        assert_eq!(activity, ActivityId::new(5));
        assert!((speed - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn program_kind_filter_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["hopelink", "program", "--kind", "Breathing"]).unwrap();
        let Commands::Program { kind } = cli.command else {
            panic!("expected program");
        };
        assert_eq!(kind, Some(ActivityKind::Breathing));
        assert!(Cli::try_parse_from(["hopelink", "program", "--kind", "yoga"]).is_err());
    }

    #[test]
    fn malformed_doctor_id_is_a_usage_error() {
        assert!(Cli::try_parse_from(["hopelink", "invite", "act-2"]).is_err());
    }
}
