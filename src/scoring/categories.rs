//! Per-category scoring functions.
//!
//! Each function is pure over a [`ScoringInput`] and returns the raw,
//! unrounded value with the detail lines explaining it. Rounding and
//! clamping to the category maximum happen in the evaluator.

use crate::config::ScoringConfig;
use crate::profiles::DestinationProfile;
use crate::scoring::{ACTIVITY_MAX, BUDGET_MAX, DURATION_MAX, TIME_MAX, TRAVEL_FLOW_MAX};
use crate::trip::{Itinerary, TripData};

const BURNOUT_DAY_PENALTY: f64 = 2.0;
const FATIGUE_DAY_PENALTY: f64 = 1.5;
const FATIGUE_PENALTY_CAP: f64 = 6.0;

pub struct ScoringInput<'a> {
    pub trip: &'a TripData,
    pub itinerary: &'a Itinerary,
    pub profile: &'a DestinationProfile,
    pub settings: &'a ScoringConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawScore {
    pub value: f64,
    pub details: Vec<String>,
}

impl RawScore {
    fn new(value: f64, details: Vec<String>) -> Self {
        Self { value, details }
    }

    fn zero(detail: impl Into<String>) -> Self {
        Self {
            value: 0.0,
            details: vec![detail.into()],
        }
    }
}

pub fn budget(input: &ScoringInput<'_>) -> RawScore {
    let days = input.itinerary.len();
    if days == 0 {
        return RawScore::zero("Trip length unknown; budget cannot be compared");
    }
    let activities = input.itinerary.total_activities();
    let profile = input.profile;
    let currency = &input.trip.currency;
    let expected = days as f64 * profile.daily_base_cost
        + f64::from(activities) * profile.activity_cost;
    let budget = input.trip.budget;

    let mut details = vec![format!(
        "Expected cost {expected:.0} {currency} ({days} days x {:.0} + {activities} activities x {:.0})",
        profile.daily_base_cost, profile.activity_cost
    )];
    if !profile.currency.eq_ignore_ascii_case(currency) {
        details.push(format!(
            "Baseline is in {}; amounts compared without conversion",
            profile.currency
        ));
    }
    if !budget.is_finite() || budget <= 0.0 {
        details.insert(0, "No budget provided".to_string());
        return RawScore::new(0.0, details);
    }
    if expected <= 0.0 {
        details.push("Expected cost is zero; budget treated as unverifiable".to_string());
        return RawScore::new(0.0, details);
    }

    let ratio = budget / expected;
    details.push(format!(
        "Budget {budget:.0} {currency} covers {:.0}% of expected",
        ratio * 100.0
    ));
    let max = f64::from(BUDGET_MAX);
    let value = if ratio >= 1.0 {
        max
    } else if ratio <= 0.5 {
        details.push("Budget is at or below half of the expected cost".to_string());
        0.0
    } else {
        max * (ratio - 0.5) / 0.5
    };
    RawScore::new(value, details)
}

/// Two-sided: peaks inside the sweet spot and falls off on both sides.
pub fn activity(input: &ScoringInput<'_>) -> RawScore {
    let itinerary = input.itinerary;
    if itinerary.is_empty() {
        return RawScore::zero("Trip length unknown; activity load cannot be assessed");
    }
    let activities = itinerary.total_activities();
    if activities == 0 {
        return RawScore::zero("No activities planned");
    }

    let profile = input.profile;
    let (low, high) = (profile.sweet_spot_min, profile.sweet_spot_max);
    let active_days = itinerary.active_days() as f64;
    let density = f64::from(activities) / active_days;
    let max = f64::from(ACTIVITY_MAX);

    let mut details = vec![format!(
        "{density:.1} activities per active day (sweet spot {low:.0}-{high:.0})"
    )];
    let mut value = density_score(density, low, high, max);
    if density < low {
        details.push("Underpacked: days are left without plans".to_string());
    } else if density > high {
        details.push("Overpacked: pace risks burnout".to_string());
    }

    let burnout_days = itinerary
        .days()
        .iter()
        .filter(|d| !d.rest && d.activities > profile.max_daily_activities)
        .count();
    if burnout_days > 0 {
        value -= BURNOUT_DAY_PENALTY * burnout_days as f64;
        details.push(format!(
            "{burnout_days} day(s) exceed the sustainable cap of {} activities",
            profile.max_daily_activities
        ));
    }
    RawScore::new(value.max(0.0), details)
}

pub fn density_score(density: f64, low: f64, high: f64, max: f64) -> f64 {
    if !density.is_finite() || low <= 0.0 || high <= 0.0 {
        return 0.0;
    }
    if density < low {
        max * density / low
    } else if density <= high {
        max
    } else {
        (max * (1.0 - (density - high) / high)).max(0.0)
    }
}

pub fn time(input: &ScoringInput<'_>) -> RawScore {
    let itinerary = input.itinerary;
    if input.trip.activity_count() == 0 {
        return RawScore::new(
            f64::from(TIME_MAX) / 2.0,
            vec!["No activities to schedule; time realism is neutral".to_string()],
        );
    }
    if itinerary.is_empty() {
        return RawScore::zero("Trip length unknown; schedule cannot be checked");
    }

    let profile = input.profile;
    let waking = input.settings.waking_hours.max(1.0);
    let active = itinerary.active_day_indices();
    let active_count = active.len().max(1) as f64;
    let transit_per_day = transit_hours(input.trip, profile) / active_count;

    let mut overload = 0.0;
    let mut peak: f64 = 0.0;
    for &day in &active {
        let demand = day_demand(itinerary.load(day).unwrap_or(0), profile, transit_per_day);
        peak = peak.max(demand);
        overload += (demand - waking).max(0.0);
    }

    let max = f64::from(TIME_MAX);
    let mut value = max * (1.0 - overload / (waking * active_count)).max(0.0);
    let mut details = vec![format!(
        "Busiest day needs about {peak:.1}h of {waking:.0}h available"
    )];
    if overload > 0.0 {
        details.push(format!(
            "{overload:.1}h of scheduled time exceed realistic waking hours"
        ));
    }

    let heavy = heavy_threshold(profile);
    if let Some((_, streak)) = itinerary.longest_heavy_streak(heavy) {
        let limit = input.settings.fatigue_streak_days as usize;
        if streak > limit {
            let penalty =
                (FATIGUE_DAY_PENALTY * (streak - limit) as f64).min(FATIGUE_PENALTY_CAP);
            value -= penalty;
            details.push(format!(
                "{streak} consecutive heavy days without rest"
            ));
        }
    }
    RawScore::new(value.max(0.0), details)
}

/// Hours one day's schedule needs: activities plus its share of transit.
pub fn day_demand(load: u32, profile: &DestinationProfile, transit_per_day: f64) -> f64 {
    f64::from(load) * profile.activity_hours + transit_per_day
}

pub fn transit_hours(trip: &TripData, profile: &DestinationProfile) -> f64 {
    f64::from(trip.hops()) * trip.travel_mode.hop_weight() * profile.hop_hours
}

/// Daily load at which a day counts as heavy for fatigue purposes.
pub fn heavy_threshold(profile: &DestinationProfile) -> u32 {
    profile.sweet_spot_max.ceil().max(1.0) as u32
}

pub fn travel_flow(input: &ScoringInput<'_>) -> RawScore {
    let days = input.itinerary.len();
    if days == 0 {
        return RawScore::zero("Trip length unknown; travel flow cannot be assessed");
    }
    let hops = input.trip.hops();
    let max = f64::from(TRAVEL_FLOW_MAX);
    if hops == 0 {
        return RawScore::new(max, vec!["Single base: no area changes".to_string()]);
    }

    let weighted = f64::from(hops) * input.trip.travel_mode.hop_weight();
    let per_day = weighted / days as f64;
    let tolerance = 1.0 / input.profile.days_per_area;
    let mut details = vec![format!(
        "{hops} area change(s) by {} over {days} days",
        input.trip.travel_mode
    )];
    let value = if per_day <= tolerance {
        max
    } else if per_day >= 1.0 {
        details.push("Moving every day fragments the trip".to_string());
        0.0
    } else {
        details.push(format!(
            "Recommended pace is one area per {:.0} days",
            input.profile.days_per_area
        ));
        max * (1.0 - (per_day - tolerance) / (1.0 - tolerance))
    };
    RawScore::new(value, details)
}

pub fn duration(input: &ScoringInput<'_>) -> RawScore {
    let days = input.itinerary.len() as u32;
    if days == 0 {
        return RawScore::zero("Trip dates unknown");
    }
    let profile = input.profile;
    let (ideal_min, ideal_max) = (profile.ideal_min_days, profile.ideal_max_days);
    let max = f64::from(DURATION_MAX);
    let mut details = vec![format!(
        "{days} days against an ideal {ideal_min}-{ideal_max} days for {}",
        profile.display_name()
    )];

    let value = if days < ideal_min {
        details.push("Shorter than recommended".to_string());
        max * f64::from(days) / f64::from(ideal_min.max(1))
    } else if days <= ideal_max {
        max
    } else {
        details.push("Longer than recommended".to_string());
        let over = f64::from(days - ideal_max) / f64::from(ideal_max.max(1));
        (max * (1.0 - over)).max(0.0)
    };
    RawScore::new(value, details)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::config::ScoringConfig;
    use crate::profiles::{DestinationProfile, ProfileRegistry};
    use crate::scoring::categories::{
        activity, budget, density_score, duration, time, travel_flow, ScoringInput,
    };
    use crate::trip::{TravelMode, TripData};

    fn paris() -> DestinationProfile {
        ProfileRegistry::with_defaults()
            .expect("defaults should load")
            .by_destination("paris")
            .cloned()
            .expect("paris profile")
    }

    fn trip(days: u32) -> TripData {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 6, days).expect("valid date");
        TripData::new("Paris").with_dates(start, end)
    }

    fn run(
        f: fn(&ScoringInput<'_>) -> super::RawScore,
        trip: &TripData,
        profile: &DestinationProfile,
    ) -> f64 {
        let itinerary = trip.itinerary();
        let settings = ScoringConfig::default();
        f(&ScoringInput {
            trip,
            itinerary: &itinerary,
            profile,
            settings: &settings,
        })
        .value
    }

    #[test]
    fn budget_full_marks_when_expected_cost_covered() {
        let profile = paris();
        let t = trip(7).with_budget(1400.0, "USD").with_activities(14);
        assert_eq!(run(budget, &t, &profile), 30.0);
    }

    #[test]
    fn budget_falls_linearly_to_zero_at_half() {
        let profile = paris();
        // expected = 2 * 150 = 300
        let three_quarters = trip(2).with_budget(225.0, "USD");
        assert!((run(budget, &three_quarters, &profile) - 15.0).abs() < 1e-9);
        let half = trip(2).with_budget(150.0, "USD");
        assert_eq!(run(budget, &half, &profile), 0.0);
    }

    #[test]
    fn budget_zero_is_scored_without_dividing() {
        let profile = paris();
        let t = trip(3).with_budget(0.0, "USD");
        let itinerary = t.itinerary();
        let settings = ScoringConfig::default();
        let raw = budget(&ScoringInput {
            trip: &t,
            itinerary: &itinerary,
            profile: &profile,
            settings: &settings,
        });
        assert_eq!(raw.value, 0.0);
        assert_eq!(raw.details[0], "No budget provided");
    }

    #[test]
    fn density_score_is_two_sided() {
        let max = 25.0;
        assert_eq!(density_score(0.0, 2.0, 3.0, max), 0.0);
        assert_eq!(density_score(1.0, 2.0, 3.0, max), 12.5);
        assert_eq!(density_score(2.0, 2.0, 3.0, max), max);
        assert_eq!(density_score(3.0, 2.0, 3.0, max), max);
        assert!((density_score(4.5, 2.0, 3.0, max) - 12.5).abs() < 1e-9);
        assert_eq!(density_score(6.0, 2.0, 3.0, max), 0.0);
        assert_eq!(density_score(9.0, 2.0, 3.0, max), 0.0);
        assert_eq!(density_score(f64::NAN, 2.0, 3.0, max), 0.0);
    }

    #[test]
    fn activity_penalizes_burnout_days_inside_sweet_spot() {
        let profile = paris();
        let even = trip(4).with_daily_loads(vec![3, 3, 3, 3]);
        let lumpy = trip(4).with_daily_loads(vec![6, 2, 2, 2]);
        assert_eq!(run(activity, &even, &profile), 25.0);
        assert_eq!(run(activity, &lumpy, &profile), 23.0);
    }

    #[test]
    fn time_is_neutral_without_activities() {
        let profile = paris();
        assert_eq!(run(time, &trip(3), &profile), 10.0);
        // no dates either: still neutral rather than zero
        assert_eq!(run(time, &TripData::new("Paris"), &profile), 10.0);
        let undated = TripData::new("Paris").with_activities(5);
        assert_eq!(run(time, &undated, &profile), 0.0);
    }

    #[test]
    fn time_penalizes_overloaded_days() {
        let profile = paris();
        let relaxed = trip(3).with_activities(6);
        let packed = trip(3).with_activities(20);
        assert_eq!(run(time, &relaxed, &profile), 20.0);
        // loads [7, 7, 6]: 20h of overload against 30h available
        assert!((run(time, &packed, &profile) - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn time_penalizes_long_heavy_streaks() {
        let profile = paris();
        let streak = trip(7).with_daily_loads(vec![3; 7]);
        let broken = trip(7).with_daily_loads(vec![3, 3, 3, 0, 3, 3, 3]).with_rest_days(vec![3]);
        // seven heavy days: three beyond the four-day limit
        assert!((run(time, &streak, &profile) - 15.5).abs() < 1e-9);
        assert_eq!(run(time, &broken, &profile), 20.0);
    }

    #[test]
    fn travel_flow_rewards_coherent_trips() {
        let profile = paris();
        assert_eq!(run(travel_flow, &trip(7), &profile), 15.0);
        assert_eq!(run(travel_flow, &trip(6).with_areas(3), &profile), 15.0);
        let fragmented = run(travel_flow, &trip(3).with_areas(3), &profile);
        assert!(fragmented < 10.0 && fragmented > 0.0);
        let flights = trip(3).with_areas(3).with_travel_mode(TravelMode::Flight);
        assert_eq!(run(travel_flow, &flights, &profile), 0.0);
    }

    #[test]
    fn duration_peaks_inside_ideal_band() {
        let profile = paris();
        assert_eq!(run(duration, &trip(2), &profile), 5.0);
        assert_eq!(run(duration, &trip(5), &profile), 10.0);
        assert!((run(duration, &trip(10), &profile) - 10.0 * (1.0 - 3.0 / 7.0)).abs() < 1e-9);
        assert_eq!(run(duration, &TripData::new("Paris"), &profile), 0.0);
    }
}
