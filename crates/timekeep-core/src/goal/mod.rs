//! Daily goal entities and field validation.
//!
//! A [`Goal`] belongs to exactly one calendar day. Its `id` and `date` are
//! fixed at creation; the editable fields travel together as [`GoalFields`]
//! and are only ever produced by [`GoalDraft::validate`].

mod store;

pub use store::{DailyCounts, GoalStore};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Store-assigned goal identifier. Never reused.
pub type GoalId = i64;

pub const MIN_HOURS: i64 = 1;
pub const MAX_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ValidationError::InvalidValue {
                field: "priority",
                message: format!("expected high, medium or low, got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Descriptive recurrence tag. Nothing re-creates goals from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }
}

impl FromStr for Recurrence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            other => Err(ValidationError::InvalidValue {
                field: "recurrence",
                message: format!("expected none, daily, weekly or monthly, got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Completion filter for goal queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalFilter {
    #[default]
    All,
    Completed,
    NotCompleted,
}

impl GoalFilter {
    pub fn matches(&self, completed: bool) -> bool {
        match self {
            GoalFilter::All => true,
            GoalFilter::Completed => completed,
            GoalFilter::NotCompleted => !completed,
        }
    }
}

impl FromStr for GoalFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(GoalFilter::All),
            "completed" | "done" => Ok(GoalFilter::Completed),
            "not-completed" | "not_completed" | "pending" => Ok(GoalFilter::NotCompleted),
            other => Err(ValidationError::InvalidValue {
                field: "filter",
                message: format!("expected all, completed or not-completed, got '{other}'"),
            }),
        }
    }
}

/// One user-defined intention for a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub date: NaiveDate,
    pub description: String,
    pub hours: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub completed: bool,
}

impl Goal {
    /// Assemble a stored goal from its creation record and assigned id.
    pub fn from_new(id: GoalId, new: NewGoal) -> Self {
        Self {
            id,
            date: new.date,
            description: new.fields.description,
            hours: new.fields.hours,
            start_time: new.fields.start_time,
            priority: new.fields.priority,
            recurrence: new.recurrence,
            completed: false,
        }
    }

    /// Overwrite the editable fields in place.
    pub fn apply(&mut self, fields: &GoalFields) {
        self.description = fields.description.clone();
        self.hours = fields.hours;
        self.start_time = fields.start_time;
        self.priority = fields.priority;
    }

    pub fn start_time_hhmm(&self) -> String {
        self.start_time.format(hhmm::FORMAT).to_string()
    }
}

/// Unvalidated caller input for the editable goal fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub description: String,
    pub hours: i64,
    pub start_time: String,
    #[serde(default)]
    pub priority: Priority,
}

impl GoalDraft {
    pub fn new(description: impl Into<String>, hours: i64, start_time: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            hours,
            start_time: start_time.into(),
            priority: Priority::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Check every field and produce the normalized form that gets persisted.
    ///
    /// # Errors
    /// Returns the first offending field: empty description, `hours` outside
    /// `1..=24`, or a `start_time` that is not a 24h `HH:MM` time of day.
    pub fn validate(&self) -> Result<GoalFields, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::Empty("description"));
        }
        if !(MIN_HOURS..=MAX_HOURS).contains(&self.hours) {
            return Err(ValidationError::OutOfRange {
                field: "hours",
                value: self.hours,
                min: MIN_HOURS,
                max: MAX_HOURS,
            });
        }
        let start_time = parse_start_time(&self.start_time)?;
        Ok(GoalFields {
            description: description.to_string(),
            hours: self.hours as u8,
            start_time,
            priority: self.priority,
        })
    }
}

/// Validated editable fields of a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalFields {
    pub description: String,
    pub hours: u8,
    pub start_time: NaiveTime,
    pub priority: Priority,
}

/// A validated goal awaiting its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub date: NaiveDate,
    pub fields: GoalFields,
    pub recurrence: Recurrence,
}

/// Parse a 24h `HH:MM` (or `H:MM`) time of day.
pub fn parse_start_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(raw.trim(), hhmm::FORMAT).map_err(|e| {
        ValidationError::InvalidValue {
            field: "start_time",
            message: format!("'{raw}' is not a HH:MM time of day ({e})"),
        }
    })
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_normalizes_fields() {
        let fields = GoalDraft::new("  Write report ", 3, "9:05")
            .with_priority(Priority::High)
            .validate()
            .unwrap();
        assert_eq!(fields.description, "Write report");
        assert_eq!(fields.hours, 3);
        assert_eq!(fields.start_time, NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(fields.priority, Priority::High);
    }

    #[test]
    fn validate_rejects_bad_fields() {
        assert_eq!(
            GoalDraft::new("   ", 1, "09:00").validate(),
            Err(ValidationError::Empty("description"))
        );
        assert!(matches!(
            GoalDraft::new("x", 0, "09:00").validate(),
            Err(ValidationError::OutOfRange { field: "hours", .. })
        ));
        assert!(matches!(
            GoalDraft::new("x", 25, "09:00").validate(),
            Err(ValidationError::OutOfRange { field: "hours", .. })
        ));
        for bad in ["24:00", "9am", "", "12:60", "12:00:00"] {
            assert!(
                matches!(
                    GoalDraft::new("x", 1, bad).validate(),
                    Err(ValidationError::InvalidValue { field: "start_time", .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Weekly".parse::<Recurrence>().unwrap(), Recurrence::Weekly);
        assert_eq!("pending".parse::<GoalFilter>().unwrap(), GoalFilter::NotCompleted);
        assert!("urgent".parse::<Priority>().is_err());
        assert!("yearly".parse::<Recurrence>().is_err());
    }

    #[test]
    fn start_time_serializes_as_hhmm() {
        let new = NewGoal {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            fields: GoalDraft::new("Read", 1, "07:30").validate().unwrap(),
            recurrence: Recurrence::Daily,
        };
        let goal = Goal::from_new(1, new);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["start_time"], "07:30");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["recurrence"], "daily");
        let back: Goal = serde_json::from_value(json).unwrap();
        assert_eq!(back, goal);
    }
}
