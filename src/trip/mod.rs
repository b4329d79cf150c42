pub mod loader;
pub mod normalize;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Caller-supplied description of a planned trip.
///
/// The engine only ever reads a `TripData`; mutations (plan application)
/// always produce a new value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripData {
    pub destination: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub planned_activities: u32,
    /// Per-day activity counts. When non-empty this is authoritative over
    /// `planned_activities`.
    #[serde(default)]
    pub daily_loads: Vec<u32>,
    /// Zero-based indices of intentional rest days.
    #[serde(default)]
    pub rest_days: Vec<usize>,
    #[serde(default = "default_area_count")]
    pub area_count: u32,
    #[serde(default)]
    pub travel_mode: TravelMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walking,
    #[default]
    Transit,
    Car,
    Flight,
}

impl TravelMode {
    /// Relative cost of a single area-to-area hop.
    pub fn hop_weight(self) -> f64 {
        match self {
            Self::Walking => 0.5,
            Self::Transit | Self::Car => 1.0,
            Self::Flight => 2.0,
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Walking => "walking",
            Self::Transit => "transit",
            Self::Car => "car",
            Self::Flight => "flight",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Error)]
#[error("unknown travel mode: {0}")]
pub struct TravelModeParseError(pub String);

impl FromStr for TravelMode {
    type Err = TravelModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" | "foot" => Ok(Self::Walking),
            "transit" | "train" | "bus" | "public" => Ok(Self::Transit),
            "car" | "drive" | "driving" => Ok(Self::Car),
            "flight" | "fly" | "plane" => Ok(Self::Flight),
            _ => Err(TravelModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    #[error("trip end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("daily activity loads add up to more than {} activities", u32::MAX)]
    TooManyActivities,
}

impl TripData {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            category: None,
            start_date: None,
            end_date: None,
            budget: 0.0,
            currency: default_currency(),
            planned_activities: 0,
            daily_loads: Vec::new(),
            rest_days: Vec::new(),
            area_count: default_area_count(),
            travel_mode: TravelMode::default(),
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_budget(mut self, budget: f64, currency: &str) -> Self {
        self.budget = budget;
        self.currency = currency.to_string();
        self
    }

    pub fn with_activities(mut self, planned: u32) -> Self {
        self.planned_activities = planned;
        self
    }

    pub fn with_daily_loads(mut self, loads: Vec<u32>) -> Self {
        self.planned_activities = sum_loads(&loads);
        self.daily_loads = loads;
        self
    }

    pub fn with_rest_days(mut self, rest_days: Vec<usize>) -> Self {
        self.rest_days = rest_days;
        self
    }

    pub fn with_areas(mut self, area_count: u32) -> Self {
        self.area_count = area_count;
        self
    }

    pub fn with_travel_mode(mut self, mode: TravelMode) -> Self {
        self.travel_mode = mode;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), TripError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(TripError::EndBeforeStart { start, end });
            }
        }
        let total = self
            .daily_loads
            .iter()
            .try_fold(0u32, |acc, load| acc.checked_add(*load));
        if total.is_none() {
            return Err(TripError::TooManyActivities);
        }
        Ok(())
    }

    pub fn has_dates(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Inclusive day count from the dates, else the itinerary length, else 0.
    pub fn duration_days(&self) -> u32 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let span = (end - start).num_days() + 1;
                u32::try_from(span).unwrap_or(0)
            }
            _ => u32::try_from(self.daily_loads.len()).unwrap_or(u32::MAX),
        }
    }

    pub fn activity_count(&self) -> u32 {
        if self.daily_loads.is_empty() {
            self.planned_activities
        } else {
            sum_loads(&self.daily_loads)
        }
    }

    pub fn hops(&self) -> u32 {
        self.area_count.saturating_sub(1)
    }

    pub fn itinerary(&self) -> Itinerary {
        Itinerary::from_trip(self)
    }

    /// Stable hash of the trip's canonical JSON form.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySlot {
    pub activities: u32,
    pub rest: bool,
}

/// Normalized per-day view of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Itinerary {
    days: Vec<DaySlot>,
}

impl Itinerary {
    pub fn from_trip(trip: &TripData) -> Self {
        let duration = trip.duration_days() as usize;
        let mut loads: Vec<u32> = if trip.daily_loads.is_empty() {
            distribute(trip.planned_activities, duration, &trip.rest_days)
        } else {
            trip.daily_loads.clone()
        };

        if loads.len() > duration {
            // surplus days fold into the final day
            let surplus = sum_loads(&loads[duration..]);
            loads.truncate(duration);
            if let Some(last) = loads.last_mut() {
                *last = last.saturating_add(surplus);
            }
        }
        loads.resize(duration, 0);

        let days = loads
            .into_iter()
            .enumerate()
            .map(|(idx, activities)| DaySlot {
                activities,
                rest: activities == 0 && trip.rest_days.contains(&idx),
            })
            .collect();
        Self { days }
    }

    pub fn from_slots(days: Vec<DaySlot>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DaySlot] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_activities(&self) -> u32 {
        self.days
            .iter()
            .fold(0u32, |acc, d| acc.saturating_add(d.activities))
    }

    pub fn rest_day_count(&self) -> usize {
        self.days.iter().filter(|d| d.rest).count()
    }

    pub fn active_day_indices(&self) -> Vec<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.rest)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Non-rest day count, never below one for a non-empty itinerary.
    pub fn active_days(&self) -> usize {
        if self.days.is_empty() {
            return 0;
        }
        (self.days.len() - self.rest_day_count()).max(1)
    }

    pub fn load(&self, day: usize) -> Option<u32> {
        self.days.get(day).map(|d| d.activities)
    }

    /// Heaviest non-rest day; earliest index wins ties.
    pub fn heaviest_day(&self) -> Option<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.rest && d.activities > 0)
            .max_by(|(ia, a), (ib, b)| a.activities.cmp(&b.activities).then(ib.cmp(ia)))
            .map(|(idx, _)| idx)
    }

    /// Lightest non-rest day other than `except`; earliest index wins ties.
    pub fn lightest_day(&self, except: usize) -> Option<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(idx, d)| *idx != except && !d.rest)
            .min_by(|(ia, a), (ib, b)| a.activities.cmp(&b.activities).then(ia.cmp(ib)))
            .map(|(idx, _)| idx)
    }

    /// Longest run of consecutive non-rest days carrying at least
    /// `threshold` activities, as `(start, length)`.
    pub fn longest_heavy_streak(&self, threshold: u32) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut current_start = 0usize;
        let mut current_len = 0usize;
        for (idx, day) in self.days.iter().enumerate() {
            if !day.rest && threshold > 0 && day.activities >= threshold {
                if current_len == 0 {
                    current_start = idx;
                }
                current_len += 1;
                if best.map(|(_, len)| current_len > len).unwrap_or(true) {
                    best = Some((current_start, current_len));
                }
            } else {
                current_len = 0;
            }
        }
        best
    }

    pub(crate) fn slot_mut(&mut self, day: usize) -> Option<&mut DaySlot> {
        self.days.get_mut(day)
    }

    /// Writes the itinerary back onto a copy of `base`.
    pub fn into_trip(self, base: &TripData) -> TripData {
        let mut trip = base.clone();
        trip.daily_loads = self.days.iter().map(|d| d.activities).collect();
        trip.rest_days = self
            .days
            .iter()
            .enumerate()
            .filter(|(_, d)| d.rest)
            .map(|(idx, _)| idx)
            .collect();
        trip.planned_activities = sum_loads(&trip.daily_loads);
        trip
    }
}

/// Sum of per-day loads, saturating at `u32::MAX`.
pub fn sum_loads(loads: &[u32]) -> u32 {
    loads.iter().fold(0u32, |acc, load| acc.saturating_add(*load))
}

fn distribute(total: u32, duration: usize, rest_days: &[usize]) -> Vec<u32> {
    if duration == 0 {
        return Vec::new();
    }
    let mut targets: Vec<usize> = (0..duration).filter(|d| !rest_days.contains(d)).collect();
    if targets.is_empty() {
        targets = (0..duration).collect();
    }
    let slots = targets.len() as u32;
    let base = total / slots;
    let remainder = total % slots;

    let mut loads = vec![0u32; duration];
    for (position, day) in targets.into_iter().enumerate() {
        loads[day] = base + u32::from((position as u32) < remainder);
    }
    loads
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_area_count() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::trip::{TravelMode, TripData, TripError};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
    }

    #[test]
    fn duration_is_inclusive_of_both_dates() {
        let trip = TripData::new("Paris").with_dates(date(1), date(7));
        assert_eq!(trip.duration_days(), 7);
        let same_day = TripData::new("Paris").with_dates(date(3), date(3));
        assert_eq!(same_day.duration_days(), 1);
    }

    #[test]
    fn rejects_end_before_start() {
        let trip = TripData::new("Paris").with_dates(date(7), date(1));
        assert_eq!(
            trip.validate(),
            Err(TripError::EndBeforeStart {
                start: date(7),
                end: date(1)
            })
        );
    }

    #[test]
    fn distributes_planned_activities_evenly() {
        let trip = TripData::new("Paris")
            .with_dates(date(1), date(3))
            .with_activities(20);
        let loads: Vec<u32> = trip.itinerary().days().iter().map(|d| d.activities).collect();
        assert_eq!(loads, vec![7, 7, 6]);
    }

    #[test]
    fn distribution_skips_rest_days() {
        let trip = TripData::new("Paris")
            .with_dates(date(1), date(4))
            .with_activities(6)
            .with_rest_days(vec![1]);
        let itinerary = trip.itinerary();
        let loads: Vec<u32> = itinerary.days().iter().map(|d| d.activities).collect();
        assert_eq!(loads, vec![2, 0, 2, 2]);
        assert_eq!(itinerary.rest_day_count(), 1);
        assert_eq!(itinerary.active_days(), 3);
    }

    #[test]
    fn rest_flag_ignored_on_days_with_activities() {
        let trip = TripData::new("Rome")
            .with_dates(date(1), date(3))
            .with_daily_loads(vec![2, 1, 2])
            .with_rest_days(vec![1]);
        assert_eq!(trip.itinerary().rest_day_count(), 0);
    }

    #[test]
    fn surplus_loads_fold_into_last_day() {
        let trip = TripData::new("Rome")
            .with_dates(date(1), date(2))
            .with_daily_loads(vec![1, 2, 3]);
        let loads: Vec<u32> = trip.itinerary().days().iter().map(|d| d.activities).collect();
        assert_eq!(loads, vec![1, 5]);
    }

    #[test]
    fn finds_longest_heavy_streak() {
        let trip = TripData::new("Rome")
            .with_dates(date(1), date(7))
            .with_daily_loads(vec![3, 1, 3, 3, 4, 3, 0]);
        assert_eq!(trip.itinerary().longest_heavy_streak(3), Some((2, 4)));
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let payload = json!({
            "destination": "Paris",
            "startDate": "2025-06-01",
            "endDate": "2025-06-07",
            "budget": 1400.0,
            "plannedActivities": 14,
            "travelMode": "walking"
        });
        let trip: TripData = serde_json::from_value(payload).expect("trip should parse");
        assert_eq!(trip.duration_days(), 7);
        assert_eq!(trip.area_count, 1);
        assert_eq!(trip.currency, "USD");
        assert_eq!(trip.travel_mode, TravelMode::Walking);
    }

    #[test]
    fn rejects_loads_that_overflow_the_total() {
        let trip = TripData::new("Paris").with_daily_loads(vec![u32::MAX, 1]);
        assert_eq!(trip.validate(), Err(TripError::TooManyActivities));
        assert_eq!(trip.activity_count(), u32::MAX);
        assert_eq!(trip.itinerary().total_activities(), u32::MAX);

        let at_limit = TripData::new("Paris").with_daily_loads(vec![u32::MAX - 1, 1]);
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = TripData::new("Paris").with_activities(3);
        let b = TripData::new("Paris").with_activities(3);
        let c = TripData::new("Paris").with_activities(4);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
