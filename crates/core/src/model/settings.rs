use std::time::Duration;

use thiserror::Error;

use crate::model::activity::{DEFAULT_BREATHING_MINUTES, DEFAULT_WALK_MINUTES};
use crate::model::journal::DEFAULT_MIN_JOURNAL_CHARS;
use crate::model::password::DEFAULT_MIN_STRENGTH;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("breathing tick must be > 0 ms")]
    InvalidBreathingTick,

    #[error("breathing phase ({phase_ms} ms) must be a positive multiple of the tick ({tick_ms} ms)")]
    InvalidBreathingPhase { phase_ms: u64, tick_ms: u64 },

    #[error("walk tick must be > 0 ms")]
    InvalidWalkTick,

    #[error("default durations must be > 0 minutes")]
    InvalidDefaultDuration,

    #[error("password strength threshold must be <= 100")]
    InvalidStrengthThreshold,
}

/// Tunables for the activity player and form validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySettings {
    breathing_phase_ms: u64,
    breathing_tick_ms: u64,
    walk_tick_ms: u64,
    default_walk_minutes: u32,
    default_breathing_minutes: u32,
    journal_min_chars: usize,
    password_min_strength: u8,
}

/// Optional overrides; unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct ActivitySettingsDraft {
    pub breathing_phase_ms: Option<u64>,
    pub breathing_tick_ms: Option<u64>,
    pub walk_tick_ms: Option<u64>,
    pub default_walk_minutes: Option<u32>,
    pub default_breathing_minutes: Option<u32>,
    pub journal_min_chars: Option<usize>,
    pub password_min_strength: Option<u8>,
}

impl ActivitySettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and fill defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a tick is zero, the breathing phase is not a
    /// multiple of its tick, a default duration is zero, or the strength
    /// threshold exceeds 100.
    pub fn validate(self) -> Result<ActivitySettings, SettingsError> {
        let defaults = ActivitySettings::default();
        let settings = ActivitySettings {
            breathing_phase_ms: self.breathing_phase_ms.unwrap_or(defaults.breathing_phase_ms),
            breathing_tick_ms: self.breathing_tick_ms.unwrap_or(defaults.breathing_tick_ms),
            walk_tick_ms: self.walk_tick_ms.unwrap_or(defaults.walk_tick_ms),
            default_walk_minutes: self
                .default_walk_minutes
                .unwrap_or(defaults.default_walk_minutes),
            default_breathing_minutes: self
                .default_breathing_minutes
                .unwrap_or(defaults.default_breathing_minutes),
            journal_min_chars: self.journal_min_chars.unwrap_or(defaults.journal_min_chars),
            password_min_strength: self
                .password_min_strength
                .unwrap_or(defaults.password_min_strength),
        };

        if settings.breathing_tick_ms == 0 {
            return Err(SettingsError::InvalidBreathingTick);
        }
        if settings.breathing_phase_ms == 0
            || settings.breathing_phase_ms % settings.breathing_tick_ms != 0
        {
            return Err(SettingsError::InvalidBreathingPhase {
                phase_ms: settings.breathing_phase_ms,
                tick_ms: settings.breathing_tick_ms,
            });
        }
        if settings.walk_tick_ms == 0 {
            return Err(SettingsError::InvalidWalkTick);
        }
        if settings.default_walk_minutes == 0 || settings.default_breathing_minutes == 0 {
            return Err(SettingsError::InvalidDefaultDuration);
        }
        if settings.password_min_strength > 100 {
            return Err(SettingsError::InvalidStrengthThreshold);
        }

        Ok(settings)
    }
}

impl ActivitySettings {
    #[must_use]
    pub fn breathing_phase(&self) -> Duration {
        Duration::from_millis(self.breathing_phase_ms)
    }

    #[must_use]
    pub fn breathing_tick(&self) -> Duration {
        Duration::from_millis(self.breathing_tick_ms)
    }

    #[must_use]
    pub fn walk_tick(&self) -> Duration {
        Duration::from_millis(self.walk_tick_ms)
    }

    #[must_use]
    pub fn default_walk_minutes(&self) -> u32 {
        self.default_walk_minutes
    }

    #[must_use]
    pub fn default_breathing_minutes(&self) -> u32 {
        self.default_breathing_minutes
    }

    #[must_use]
    pub fn journal_min_chars(&self) -> usize {
        self.journal_min_chars
    }

    #[must_use]
    pub fn password_min_strength(&self) -> u8 {
        self.password_min_strength
    }
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            breathing_phase_ms: 4_000,
            breathing_tick_ms: 100,
            walk_tick_ms: 1_000,
            default_walk_minutes: DEFAULT_WALK_MINUTES,
            default_breathing_minutes: DEFAULT_BREATHING_MINUTES,
            journal_min_chars: DEFAULT_MIN_JOURNAL_CHARS,
            password_min_strength: DEFAULT_MIN_STRENGTH,
        }
    }
}
