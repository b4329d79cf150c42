pub mod apply;
pub mod generator;
pub mod ranking;
pub mod strategies;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::TripPossibilityResult;
use crate::trip::TripData;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    Balanced,
    Relaxed,
    Budget,
}

impl StrategyId {
    /// Declaration order; ranking ties keep this order.
    pub const ALL: [StrategyId; 3] = [StrategyId::Balanced, StrategyId::Relaxed, StrategyId::Budget];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Relaxed => "relaxed",
            Self::Budget => "budget",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Balanced => "Balanced Plan",
            Self::Relaxed => "Relaxed Pace",
            Self::Budget => "Budget Saver",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Balanced => "⚖️",
            Self::Relaxed => "🌴",
            Self::Budget => "💰",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Balanced => "Smallest change that lifts the weakest part of the trip.",
            Self::Relaxed => "Spreads the schedule out and adds breathing room.",
            Self::Budget => "Cuts cost exposure by merging or dropping paid activities.",
        }
    }
}

impl Display for StrategyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown optimization strategy: {0}")]
pub struct StrategyParseError(pub String);

impl FromStr for StrategyId {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "relaxed" => Ok(Self::Relaxed),
            "budget" => Ok(Self::Budget),
            _ => Err(StrategyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    MoveActivity,
    RemoveActivity,
    AddRest,
    MergeActivities,
}

/// One replayable edit to a trip's itinerary. Day indices are zero-based.
///
/// Deserialized changes without display text get it generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "TripChangeRecord")]
pub struct TripChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub day: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_day: Option<usize>,
    #[serde(default = "default_count")]
    pub count: u32,
    pub description: String,
    pub impact: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripChangeRecord {
    #[serde(rename = "type")]
    change_type: ChangeType,
    day: usize,
    #[serde(default)]
    to_day: Option<usize>,
    #[serde(default = "default_count")]
    count: u32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    impact: String,
}

impl From<TripChangeRecord> for TripChange {
    fn from(record: TripChangeRecord) -> Self {
        let mut change = Self {
            change_type: record.change_type,
            day: record.day,
            to_day: record.to_day,
            count: record.count,
            description: record.description,
            impact: record.impact,
        };
        if change.description.is_empty() || change.impact.is_empty() {
            change.refresh_text();
        }
        change
    }
}

impl TripChange {
    pub fn move_activity(from: usize, to: usize, count: u32) -> Self {
        Self::build(ChangeType::MoveActivity, from, Some(to), count)
    }

    pub fn remove_activity(day: usize, count: u32) -> Self {
        Self::build(ChangeType::RemoveActivity, day, None, count)
    }

    pub fn merge_activities(day: usize, count: u32) -> Self {
        Self::build(ChangeType::MergeActivities, day, None, count)
    }

    pub fn add_rest(day: usize) -> Self {
        Self::build(ChangeType::AddRest, day, None, 1)
    }

    fn build(change_type: ChangeType, day: usize, to_day: Option<usize>, count: u32) -> Self {
        let mut change = Self {
            change_type,
            day,
            to_day,
            count,
            description: String::new(),
            impact: String::new(),
        };
        change.refresh_text();
        change
    }

    /// True when `other` is the same edit on the same day(s).
    pub fn same_target(&self, other: &TripChange) -> bool {
        self.change_type == other.change_type
            && self.day == other.day
            && self.to_day == other.to_day
            && self.change_type != ChangeType::AddRest
    }

    pub(crate) fn absorb(&mut self, count: u32) {
        self.count += count;
        self.refresh_text();
    }

    fn refresh_text(&mut self) {
        let day = self.day + 1;
        let noun = if self.count == 1 { "activity" } else { "activities" };
        let (description, impact) = match self.change_type {
            ChangeType::MoveActivity => (
                format!(
                    "Move {} {noun} from day {day} to day {}",
                    self.count,
                    self.to_day.map(|d| d + 1).unwrap_or(day)
                ),
                "Evens out the daily load".to_string(),
            ),
            ChangeType::RemoveActivity => (
                format!("Drop {} {noun} from day {day}", self.count),
                "Lowers activity load and cost".to_string(),
            ),
            ChangeType::MergeActivities => (
                format!(
                    "Combine {} pair(s) of activities on day {day} into shared outings",
                    self.count
                ),
                "Saves one activity cost per merge".to_string(),
            ),
            ChangeType::AddRest => (
                format!("Keep day {day} free as a rest day"),
                "Breaks up consecutive heavy days".to_string(),
            ),
        };
        self.description = description;
        self.impact = impact;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedTrip {
    pub id: StrategyId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub possibility: TripPossibilityResult,
    pub improvement_percentage: i32,
    pub tradeoffs: Vec<String>,
    pub changes: Vec<TripChange>,
    /// The original trip with `changes` applied.
    pub trip: TripData,
}

fn default_count() -> u32 {
    1
}
