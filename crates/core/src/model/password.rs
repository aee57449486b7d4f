use serde::Serialize;
use thiserror::Error;

/// Minimum strength a new password needs before it is accepted.
pub const DEFAULT_MIN_STRENGTH: u8 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasswordError {
    #[error("{0} password is required")]
    Missing(PasswordField),

    #[error("new password and confirmation do not match")]
    Mismatch,

    #[error("password is too weak (strength {strength}, need {required})")]
    TooWeak { strength: u8, required: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    Current,
    New,
    Confirm,
}

impl std::fmt::Display for PasswordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PasswordField::Current => "current",
            PasswordField::New => "new",
            PasswordField::Confirm => "confirmation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            0..30 => StrengthLevel::Weak,
            30..60 => StrengthLevel::Medium,
            _ => StrengthLevel::Strong,
        }
    }
}

fn has_lower(pw: &str) -> bool {
    pw.chars().any(|c| c.is_ascii_lowercase())
}

fn has_upper(pw: &str) -> bool {
    pw.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(pw: &str) -> bool {
    pw.chars().any(|c| c.is_ascii_digit())
}

fn has_special(pw: &str) -> bool {
    pw.chars().any(|c| !c.is_ascii_alphanumeric())
}

fn long_enough(pw: &str) -> bool {
    pw.chars().count() >= 8
}

/// Score a password 0..=100.
///
/// Length >= 8 and each of lowercase/uppercase are worth 25, a digit 15, and
/// any non-alphanumeric character 10.
#[must_use]
pub fn password_strength(pw: &str) -> u8 {
    let mut score: u8 = 0;
    if long_enough(pw) {
        score += 25;
    }
    if has_lower(pw) {
        score += 25;
    }
    if has_upper(pw) {
        score += 25;
    }
    if has_digit(pw) {
        score += 15;
    }
    if has_special(pw) {
        score += 10;
    }
    score.min(100)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordRequirement {
    pub text: &'static str,
    pub met: bool,
}

/// Checklist shown next to the new-password field.
#[must_use]
pub fn requirements(pw: &str) -> Vec<PasswordRequirement> {
    vec![
        PasswordRequirement {
            text: "At least 8 characters",
            met: long_enough(pw),
        },
        PasswordRequirement {
            text: "Contains lowercase letter",
            met: has_lower(pw),
        },
        PasswordRequirement {
            text: "Contains uppercase letter",
            met: has_upper(pw),
        },
        PasswordRequirement {
            text: "Contains number",
            met: has_digit(pw),
        },
        PasswordRequirement {
            text: "Contains special character",
            met: has_special(pw),
        },
    ]
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChange {
    /// Validate against the default minimum strength.
    ///
    /// # Errors
    ///
    /// See [`PasswordChange::validate_with`].
    pub fn validate(&self) -> Result<StrengthLevel, PasswordError> {
        self.validate_with(DEFAULT_MIN_STRENGTH)
    }

    /// # Errors
    ///
    /// Returns `PasswordError::Missing` for an empty field, `Mismatch` when the
    /// confirmation differs, and `TooWeak` below `min_strength`.
    pub fn validate_with(&self, min_strength: u8) -> Result<StrengthLevel, PasswordError> {
        for (value, field) in [
            (&self.current, PasswordField::Current),
            (&self.new, PasswordField::New),
            (&self.confirm, PasswordField::Confirm),
        ] {
            if value.is_empty() {
                return Err(PasswordError::Missing(field));
            }
        }
        if self.new != self.confirm {
            return Err(PasswordError::Mismatch);
        }
        let strength = password_strength(&self.new);
        if strength < min_strength {
            return Err(PasswordError::TooWeak {
                strength,
                required: min_strength,
            });
        }
        Ok(StrengthLevel::from_score(strength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_each_rule() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 25);
        assert_eq!(password_strength("abcdefgh"), 50);
        assert_eq!(password_strength("Abcdefgh"), 75);
        assert_eq!(password_strength("Abcdefg1"), 90);
        assert_eq!(password_strength("Abcdef1!"), 100);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(StrengthLevel::from_score(29), StrengthLevel::Weak);
        assert_eq!(StrengthLevel::from_score(30), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_score(59), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_score(60), StrengthLevel::Strong);
    }

    #[test]
    fn requirements_report_each_rule() {
        let reqs = requirements("abc1");
        let met: Vec<bool> = reqs.iter().map(|r| r.met).collect();
        assert_eq!(met, vec![false, true, false, true, false]);
    }

    fn change(current: &str, new: &str, confirm: &str) -> PasswordChange {
        PasswordChange {
            current: current.into(),
            new: new.into(),
            confirm: confirm.into(),
        }
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        assert_eq!(
            change("", "x", "x").validate().unwrap_err(),
            PasswordError::Missing(PasswordField::Current)
        );
        assert_eq!(
            change("old", "", "").validate().unwrap_err(),
            PasswordError::Missing(PasswordField::New)
        );
    }

    #[test]
    fn confirmation_must_match() {
        assert_eq!(
            change("old", "Abcdef1!", "Abcdef1?").validate().unwrap_err(),
            PasswordError::Mismatch
        );
    }

    #[test]
    fn weak_password_is_rejected() {
        assert_eq!(
            change("old", "abcdefgh", "abcdefgh").validate().unwrap_err(),
            PasswordError::TooWeak {
                strength: 50,
                required: 60
            }
        );
    }

    #[test]
    fn strong_password_is_accepted() {
        assert_eq!(
            change("old", "Abcdefgh", "Abcdefgh").validate().unwrap(),
            StrengthLevel::Strong
        );
    }
}
