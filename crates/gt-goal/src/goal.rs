// goal.rs — Goal, SmallGoal, and the seven-day WeeklyGoals map.
//
// Wire format (one JSON array holds every goal):
//   { "id", "title", "isMainGoal", "completed", "createdAt",
//     "weeklyGoals": { "Monday": [ { "id", "text", "reminderTime", "completed" } ], ... } }
//
// Older records may use `text` instead of `title` and may omit fields
// entirely; decoding goes through `StoredGoal`, where every field is
// optional and the fallbacks are applied in one place.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::error::ValidationError;

/// Generate a fresh identifier for a goal or small goal.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Day of the week a small goal is scheduled on.
///
/// Declaration order is week order (Monday first); `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Full English name, as used for the map keys in the stored blob.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter label ("Mon").
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_ascii_lowercase();
                wanted == name || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| ValidationError::UnknownWeekday(s.to_string()))
    }
}

/// A sub-task scheduled on one weekday of a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallGoal {
    #[serde(default = "new_id")]
    pub id: String,

    pub text: String,

    /// Opaque timestamp supplied by the time-of-day input.
    pub reminder_time: DateTime<Utc>,

    #[serde(default)]
    pub completed: bool,
}

impl SmallGoal {
    /// Create an incomplete small goal. The text is trimmed and must not be empty.
    pub fn new(text: &str, reminder_time: DateTime<Utc>) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptySmallGoalText);
        }
        Ok(Self {
            id: new_id(),
            text: text.to_string(),
            reminder_time,
            completed: false,
        })
    }
}

/// Small goals grouped by weekday.
///
/// Always holds all seven days; a day with nothing scheduled maps to an
/// empty list. Serializes as a JSON object keyed by day name in week order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<SmallGoal>>")]
pub struct WeeklyGoals {
    days: BTreeMap<Weekday, Vec<SmallGoal>>,
}

impl WeeklyGoals {
    /// Seven empty days.
    pub fn new() -> Self {
        Self {
            days: Weekday::ALL.into_iter().map(|d| (d, Vec::new())).collect(),
        }
    }

    pub fn day(&self, day: Weekday) -> &[SmallGoal] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut Vec<SmallGoal> {
        self.days.entry(day).or_default()
    }

    /// Append a small goal to the end of `day`.
    pub fn push(&mut self, day: Weekday, small_goal: SmallGoal) {
        self.day_mut(day).push(small_goal);
    }

    /// Number of small goals scheduled on `day`.
    pub fn count(&self, day: Weekday) -> usize {
        self.day(day).len()
    }

    pub fn total(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn completed_total(&self) -> usize {
        self.days
            .values()
            .flatten()
            .filter(|sg| sg.completed)
            .count()
    }

    /// Days in week order with their small goals.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[SmallGoal])> {
        self.days.iter().map(|(day, goals)| (*day, goals.as_slice()))
    }

    pub(crate) fn contains_id(&self, id: &str) -> bool {
        self.days.values().flatten().any(|sg| sg.id == id)
    }

    /// Give every small goal after the first with a given id a fresh one,
    /// scanning days in week order. Returns how many ids were replaced.
    pub(crate) fn dedupe_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut replaced = 0;
        for small_goal in self.days.values_mut().flatten() {
            if seen.insert(small_goal.id.clone()) {
                continue;
            }
            small_goal.id = new_id();
            while !seen.insert(small_goal.id.clone()) {
                small_goal.id = new_id();
            }
            replaced += 1;
        }
        replaced
    }
}

impl Default for WeeklyGoals {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<BTreeMap<String, Vec<SmallGoal>>> for WeeklyGoals {
    type Error = ValidationError;

    fn try_from(raw: BTreeMap<String, Vec<SmallGoal>>) -> Result<Self, Self::Error> {
        let mut weekly = WeeklyGoals::new();
        for (name, goals) in raw {
            let day: Weekday = name.parse()?;
            weekly.day_mut(day).extend(goals);
        }
        Ok(weekly)
    }
}

impl Serialize for WeeklyGoals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, goals) in &self.days {
            map.serialize_entry(day.name(), goals)?;
        }
        map.end()
    }
}

/// A user-defined top-level objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredGoal")]
pub struct Goal {
    /// Unique within the store; never changes after creation.
    pub id: String,

    pub title: String,

    pub is_main_goal: bool,

    pub completed: bool,

    pub created_at: DateTime<Utc>,

    pub weekly_goals: WeeklyGoals,
}

impl Goal {
    /// Create an incomplete main goal. The title is trimmed and must not be empty.
    pub fn new(title: &str, weekly_goals: WeeklyGoals) -> Result<Self, ValidationError> {
        Ok(Self {
            id: new_id(),
            title: validate_title(title)?,
            is_main_goal: true,
            completed: false,
            created_at: Utc::now(),
            weekly_goals,
        })
    }
}

/// Trim a goal title, rejecting blank input.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title.to_string())
}

/// Decoding form of [`Goal`]: every field optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGoal {
    id: Option<String>,
    title: Option<String>,
    /// Name used for the title by the earliest to-do list records.
    text: Option<String>,
    is_main_goal: Option<bool>,
    completed: Option<bool>,
    created_at: Option<DateTime<Utc>>,
    weekly_goals: Option<WeeklyGoals>,
}

impl From<StoredGoal> for Goal {
    fn from(stored: StoredGoal) -> Self {
        Self {
            id: stored.id.unwrap_or_else(new_id),
            title: stored.title.or(stored.text).unwrap_or_default(),
            is_main_goal: stored.is_main_goal.unwrap_or(true),
            completed: stored.completed.unwrap_or(false),
            created_at: stored.created_at.unwrap_or_else(Utc::now),
            weekly_goals: stored.weekly_goals.unwrap_or_default(),
        }
    }
}
