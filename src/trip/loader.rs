use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::trip::normalize::normalize_trip;
use crate::trip::{sum_loads, TravelMode, TripData};

/// Field-level overrides applied on top of a trip file (or an empty trip).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripOverrides {
    pub destination: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub currency: Option<String>,
    pub planned_activities: Option<u32>,
    pub daily_loads: Option<Vec<u32>>,
    pub area_count: Option<u32>,
    pub travel_mode: Option<TravelMode>,
}

pub fn load_trip(path: Option<&Path>, overrides: &TripOverrides) -> Result<TripData> {
    let mut trip = match path {
        Some(path) => read_trip_file(path)?,
        None => {
            let destination = overrides
                .destination
                .clone()
                .ok_or_else(|| anyhow!("either --trip <file> or --destination is required"))?;
            TripData::new(destination)
        }
    };
    apply_overrides(&mut trip, overrides);
    normalize_trip(&mut trip);
    trip.validate()?;
    Ok(trip)
}

pub fn read_trip_file(path: &Path) -> Result<TripData> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading trip file: {}", path.display()))?;
    let trip: TripData = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing trip JSON: {}", path.display()))?;
    Ok(trip)
}

pub fn apply_overrides(trip: &mut TripData, overrides: &TripOverrides) {
    if let Some(v) = &overrides.destination {
        trip.destination = v.clone();
    }
    if let Some(v) = &overrides.category {
        trip.category = Some(v.clone());
    }
    if let Some(v) = overrides.start_date {
        trip.start_date = Some(v);
    }
    if let Some(v) = overrides.end_date {
        trip.end_date = Some(v);
    }
    if let Some(v) = overrides.budget {
        trip.budget = v;
    }
    if let Some(v) = &overrides.currency {
        trip.currency = v.clone();
    }
    if let Some(v) = overrides.planned_activities {
        trip.planned_activities = v;
        trip.daily_loads.clear();
    }
    if let Some(v) = &overrides.daily_loads {
        trip.planned_activities = sum_loads(v);
        trip.daily_loads = v.clone();
    }
    if let Some(v) = overrides.area_count {
        trip.area_count = v;
    }
    if let Some(v) = overrides.travel_mode {
        trip.travel_mode = v;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::trip::loader::{apply_overrides, load_trip, TripOverrides};
    use crate::trip::TripData;

    #[test]
    fn builds_trip_from_overrides_alone() {
        let overrides = TripOverrides {
            destination: Some(" Paris ".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 7),
            budget: Some(1400.0),
            planned_activities: Some(14),
            ..TripOverrides::default()
        };
        let trip = load_trip(None, &overrides).expect("trip should load");
        assert_eq!(trip.destination, "Paris");
        assert_eq!(trip.duration_days(), 7);
        assert_eq!(trip.activity_count(), 14);
    }

    #[test]
    fn requires_destination_without_file() {
        assert!(load_trip(None, &TripOverrides::default()).is_err());
    }

    #[test]
    fn rejects_reversed_dates() {
        let overrides = TripOverrides {
            destination: Some("Paris".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 7),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..TripOverrides::default()
        };
        assert!(load_trip(None, &overrides).is_err());
    }

    #[test]
    fn activity_override_discards_stale_loads() {
        let mut trip = TripData::new("Paris").with_daily_loads(vec![3, 3]);
        apply_overrides(
            &mut trip,
            &TripOverrides {
                planned_activities: Some(2),
                ..TripOverrides::default()
            },
        );
        assert!(trip.daily_loads.is_empty());
        assert_eq!(trip.activity_count(), 2);
    }
}
