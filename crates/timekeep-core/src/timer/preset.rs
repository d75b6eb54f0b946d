use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Named focus/break pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 25 minutes focus, 5 minutes break.
    #[default]
    Short,
    /// 50 minutes focus, 10 minutes break.
    Long,
}

impl Preset {
    pub fn durations(&self) -> Durations {
        let (focus_min, break_min) = match self {
            Preset::Short => (25, 5),
            Preset::Long => (50, 10),
        };
        Durations {
            focus_secs: focus_min * 60,
            break_secs: break_min * 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Short => "short",
            Preset::Long => "long",
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "25-5" => Ok(Preset::Short),
            "long" | "50-10" => Ok(Preset::Long),
            other => Err(ValidationError::InvalidValue {
                field: "preset",
                message: format!("expected short (25-5) or long (50-10), got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Focus and break lengths for one session, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Durations {
    focus_secs: u64,
    break_secs: u64,
}

impl Durations {
    /// # Errors
    /// Returns `InvalidValue` if either duration is zero.
    pub fn new(focus_secs: u64, break_secs: u64) -> Result<Self, ValidationError> {
        for (field, value) in [("focus_secs", focus_secs), ("break_secs", break_secs)] {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field,
                    message: "must be a positive number of seconds".into(),
                });
            }
        }
        Ok(Self {
            focus_secs,
            break_secs,
        })
    }

    pub fn focus_secs(&self) -> u64 {
        self.focus_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }
}

impl From<Preset> for Durations {
    fn from(preset: Preset) -> Self {
        preset.durations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_classic_lengths() {
        assert_eq!(Preset::Short.durations(), Durations::new(1500, 300).unwrap());
        assert_eq!(Preset::Long.durations(), Durations::new(3000, 600).unwrap());
    }

    #[test]
    fn preset_aliases_parse() {
        assert_eq!("25-5".parse::<Preset>().unwrap(), Preset::Short);
        assert_eq!("LONG".parse::<Preset>().unwrap(), Preset::Long);
        assert!("90-30".parse::<Preset>().is_err());
    }

    #[test]
    fn zero_durations_are_rejected() {
        assert!(matches!(
            Durations::new(0, 5),
            Err(ValidationError::InvalidValue { field: "focus_secs", .. })
        ));
        assert!(matches!(
            Durations::new(5, 0),
            Err(ValidationError::InvalidValue { field: "break_secs", .. })
        ));
    }
}
