use anyhow::{Context, Result};
use clap::Args;
use hopelink_core::model::{ActivitySettings, ActivitySettingsDraft};
use tracing_subscriber::EnvFilter;

/// Tunables for the player and form checks. Unset values keep their defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    /// Length of each box-breathing phase in milliseconds
    #[arg(long, env = "HOPELINK_BREATHING_PHASE_MS", global = true)]
    pub breathing_phase_ms: Option<u64>,

    /// Breathing timer resolution in milliseconds
    #[arg(long, env = "HOPELINK_BREATHING_TICK_MS", global = true)]
    pub breathing_tick_ms: Option<u64>,

    /// Walk timer resolution in milliseconds
    #[arg(long, env = "HOPELINK_WALK_TICK_MS", global = true)]
    pub walk_tick_ms: Option<u64>,

    /// Minimum journal entry length in characters
    #[arg(long, env = "HOPELINK_JOURNAL_MIN_CHARS", global = true)]
    pub journal_min_chars: Option<usize>,

    /// Minimum password strength score (0-100)
    #[arg(long, env = "HOPELINK_PASSWORD_MIN_STRENGTH", global = true)]
    pub password_min_strength: Option<u8>,
}

impl SettingsArgs {
    pub fn resolve(self) -> Result<ActivitySettings> {
        ActivitySettingsDraft {
            breathing_phase_ms: self.breathing_phase_ms,
            breathing_tick_ms: self.breathing_tick_ms,
            walk_tick_ms: self.walk_tick_ms,
            journal_min_chars: self.journal_min_chars,
            password_min_strength: self.password_min_strength,
            ..ActivitySettingsDraft::new()
        }
        .validate()
        .context("invalid activity settings")
    }
}

/// Install the stderr subscriber. `filter` uses `EnvFilter` syntax.
pub fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
