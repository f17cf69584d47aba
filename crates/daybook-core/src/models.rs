use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Color used when a task's group no longer exists.
pub const FALLBACK_GROUP_COLOR: &str = "#6B7280";

pub type GroupId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl RepeatType {
    pub fn label(&self) -> &'static str {
        match self {
            RepeatType::None => "No repeat",
            RepeatType::Daily => "Daily",
            RepeatType::Weekly => "Weekly",
            RepeatType::Monthly => "Monthly",
            RepeatType::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for RepeatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepeatType::None => write!(f, "none"),
            RepeatType::Daily => write!(f, "daily"),
            RepeatType::Weekly => write!(f, "weekly"),
            RepeatType::Monthly => write!(f, "monthly"),
            RepeatType::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat type: {0}")]
pub struct ParseRepeatTypeError(String);

impl FromStr for RepeatType {
    type Err = ParseRepeatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(RepeatType::None),
            "daily" => Ok(RepeatType::Daily),
            "weekly" => Ok(RepeatType::Weekly),
            "monthly" => Ok(RepeatType::Monthly),
            "custom" => Ok(RepeatType::Custom),
            _ => Err(ParseRepeatTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RepeatUnit {
    Days,
    Weeks,
    Months,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat unit: {0}")]
pub struct ParseRepeatUnitError(String);

impl FromStr for RepeatUnit {
    type Err = ParseRepeatUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "days" => Ok(RepeatUnit::Days),
            "week" | "weeks" => Ok(RepeatUnit::Weeks),
            "month" | "months" => Ok(RepeatUnit::Months),
            _ => Err(ParseRepeatUnitError(s.to_string())),
        }
    }
}

/// Cadence settings for `RepeatType::Custom`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomRepeat {
    /// Every `interval` units; must be positive
    pub interval: u32,
    pub unit: RepeatUnit,
    /// Last date an occurrence may start on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Occurrence start dates that are left out of the series
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub skip_dates: BTreeSet<NaiveDate>,
}

impl CustomRepeat {
    pub fn every(interval: u32, unit: RepeatUnit) -> Self {
        Self {
            interval,
            unit,
            end_date: None,
            skip_dates: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Reminder {
    pub enabled: bool,
    /// Minutes before the task's start time; duplicates are allowed
    #[serde(default)]
    pub times: Vec<u32>,
}

impl Reminder {
    pub fn at(times: Vec<u32>) -> Self {
        Self {
            enabled: !times.is_empty(),
            times,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Wall-clock time used for reminders and conflict checks only
    pub start_time: Option<NaiveTime>,
    pub group_id: GroupId,
    pub color: Option<String>,
    pub tags: BTreeSet<String>,
    pub repeat_type: RepeatType,
    pub custom_repeat: Option<CustomRepeat>,
    pub reminder: Reminder,
    pub is_focus: bool,
    /// Set on virtual occurrences only, pointing at the stored base task
    pub parent_task_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: String::new(),
            description: None,
            completed: false,
            start_date: now.date_naive(),
            end_date: now.date_naive(),
            start_time: None,
            group_id: "personal".to_string(),
            color: None,
            tags: BTreeSet::new(),
            repeat_type: RepeatType::None,
            custom_repeat: None,
            reminder: Reminder::default(),
            is_focus: false,
            parent_task_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Task {
    #[inline]
    pub fn is_repeating(&self) -> bool {
        self.repeat_type != RepeatType::None
    }

    /// Whole days between start and end; a single-day task has duration 0.
    pub fn duration_days(&self) -> u64 {
        (self.end_date - self.start_date).num_days().max(0) as u64
    }

    /// The custom cadence, only when the task actually repeats on one.
    pub fn custom_cadence(&self) -> Option<&CustomRepeat> {
        match self.repeat_type {
            RepeatType::Custom => self.custom_repeat.as_ref(),
            _ => None,
        }
    }

    /// Inclusive overlap between the task span and `[start, end]`.
    #[inline]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.end_date >= start && self.start_date <= end
    }

    #[inline]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Own color, else the group's color, else [`FALLBACK_GROUP_COLOR`].
    pub fn effective_color<'a>(&'a self, groups: &'a [Group]) -> &'a str {
        match &self.color {
            Some(color) => color,
            None => group_color(groups, &self.group_id),
        }
    }
}

/// Lowercases, trims and deduplicates tags, dropping empty ones.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub color: String,
    pub order: u32,
}

/// Groups seeded into an empty store.
pub fn default_groups() -> Vec<Group> {
    vec![
        Group {
            id: "work".to_string(),
            name: "Work".to_string(),
            color: "#3B82F6".to_string(),
            order: 0,
        },
        Group {
            id: "study".to_string(),
            name: "Study".to_string(),
            color: "#8B5CF6".to_string(),
            order: 1,
        },
        Group {
            id: "personal".to_string(),
            name: "Personal".to_string(),
            color: "#10B981".to_string(),
            order: 2,
        },
    ]
}

pub fn group_color<'a>(groups: &'a [Group], group_id: &str) -> &'a str {
    groups
        .iter()
        .find(|g| g.id == group_id)
        .map(|g| g.color.as_str())
        .unwrap_or(FALLBACK_GROUP_COLOR)
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// Defaults to `start_date` when absent
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub group_id: GroupId,
    pub color: Option<String>,
    pub tags: Vec<String>,
    pub repeat_type: RepeatType,
    pub custom_repeat: Option<CustomRepeat>,
    pub reminder: Reminder,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<Option<NaiveTime>>,
    pub group_id: Option<GroupId>,
    pub color: Option<Option<String>>,
    pub add_tags: Option<Vec<String>>,
    pub remove_tags: Option<Vec<String>>,
    pub repeat_type: Option<RepeatType>,
    pub custom_repeat: Option<Option<CustomRepeat>>,
    pub reminder: Option<Reminder>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateGroupData {
    pub name: Option<String>,
    pub color: Option<String>,
    pub order: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case("none", RepeatType::None)]
    #[case("Daily", RepeatType::Daily)]
    #[case("WEEKLY", RepeatType::Weekly)]
    #[case("monthly", RepeatType::Monthly)]
    #[case("custom", RepeatType::Custom)]
    fn test_repeat_type_from_str(#[case] input: &str, #[case] expected: RepeatType) {
        assert_eq!(input.parse::<RepeatType>(), Ok(expected));
        assert_eq!(expected.to_string().parse::<RepeatType>(), Ok(expected));
    }

    #[test]
    fn test_repeat_type_rejects_unknown() {
        assert!("yearly".parse::<RepeatType>().is_err());
        assert!("fortnight".parse::<RepeatUnit>().is_err());
    }

    #[test]
    fn test_custom_repeat_rejects_unknown_unit_on_deserialize() {
        let json = r#"{"interval": 2, "unit": "years"}"#;
        assert!(serde_json::from_str::<CustomRepeat>(json).is_err());

        let json = r#"{"interval": 2, "unit": "weeks", "skip_dates": ["2024-01-03"]}"#;
        let custom: CustomRepeat = serde_json::from_str(json).unwrap();
        assert_eq!(custom.unit, RepeatUnit::Weeks);
        assert!(custom.skip_dates.contains(&date("2024-01-03")));
        assert!(custom.end_date.is_none());
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["Work", " urgent ", "work", "", "URGENT"]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["urgent", "work"]);
    }

    #[test]
    fn test_duration_and_overlap() {
        let task = Task {
            start_date: date("2024-01-01"),
            end_date: date("2024-01-03"),
            ..Default::default()
        };
        assert_eq!(task.duration_days(), 2);
        assert!(task.overlaps(date("2024-01-03"), date("2024-01-10")));
        assert!(task.overlaps(date("2023-12-01"), date("2024-01-01")));
        assert!(!task.overlaps(date("2024-01-04"), date("2024-01-10")));
        assert!(task.contains_date(date("2024-01-02")));
        assert!(!task.contains_date(date("2024-01-04")));
    }

    #[test]
    fn test_custom_cadence_only_for_custom_type() {
        let mut task = Task {
            repeat_type: RepeatType::Daily,
            custom_repeat: Some(CustomRepeat::every(2, RepeatUnit::Days)),
            ..Default::default()
        };
        assert!(task.custom_cadence().is_none());
        task.repeat_type = RepeatType::Custom;
        assert_eq!(task.custom_cadence().map(|c| c.interval), Some(2));
    }

    #[test]
    fn test_effective_color_fallbacks() {
        let groups = default_groups();
        let mut task = Task {
            group_id: "work".to_string(),
            ..Default::default()
        };
        assert_eq!(task.effective_color(&groups), "#3B82F6");

        task.group_id = "deleted".to_string();
        assert_eq!(task.effective_color(&groups), FALLBACK_GROUP_COLOR);

        task.color = Some("#EF4444".to_string());
        assert_eq!(task.effective_color(&groups), "#EF4444");
    }
}
