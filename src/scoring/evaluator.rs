use tracing::debug;

use crate::config::ScoringConfig;
use crate::profiles::{ProfileLookup, ProfileSource, ResolvedProfile};
use crate::scoring::categories::{self, RawScore, ScoringInput};
use crate::scoring::issues::classify_issues;
use crate::scoring::{
    Category, CategoryScore, Confidence, FeasibilityStatus, PossibilityBreakdown,
    TripPossibilityResult,
};
use crate::trip::{TripData, TripError};

/// Scores trips against baselines from an injected [`ProfileLookup`].
///
/// Holds no mutable state; one scorer can serve any number of callers.
#[derive(Clone, Copy)]
pub struct FeasibilityScorer<'a> {
    profiles: &'a dyn ProfileLookup,
    settings: &'a ScoringConfig,
}

impl<'a> FeasibilityScorer<'a> {
    pub fn new(profiles: &'a dyn ProfileLookup, settings: &'a ScoringConfig) -> Self {
        Self { profiles, settings }
    }

    pub fn settings(&self) -> &ScoringConfig {
        self.settings
    }

    pub fn resolve(&self, trip: &TripData) -> ResolvedProfile {
        self.profiles
            .resolve(&trip.destination, trip.category.as_deref())
    }

    pub fn score(&self, trip: &TripData) -> Result<TripPossibilityResult, TripError> {
        trip.validate()?;
        let resolved = self.resolve(trip);
        Ok(evaluate_trip(trip, &resolved, self.settings))
    }
}

pub fn evaluate_trip(
    trip: &TripData,
    resolved: &ResolvedProfile,
    settings: &ScoringConfig,
) -> TripPossibilityResult {
    let itinerary = trip.itinerary();
    let input = ScoringInput {
        trip,
        itinerary: &itinerary,
        profile: &resolved.profile,
        settings,
    };

    let breakdown = PossibilityBreakdown {
        budget_score: to_category_score(Category::Budget, categories::budget(&input)),
        activity_score: to_category_score(Category::Activity, categories::activity(&input)),
        time_score: to_category_score(Category::Time, categories::time(&input)),
        travel_flow_score: to_category_score(
            Category::TravelFlow,
            categories::travel_flow(&input),
        ),
        duration_score: to_category_score(Category::Duration, categories::duration(&input)),
    };

    let overall_score = breakdown.total();
    let status = FeasibilityStatus::from_percentage(overall_score);
    let issues = classify_issues(&breakdown);
    let confidence = Confidence::from_missing_signals(missing_signals(trip, resolved.source));

    debug!(
        destination = %trip.destination,
        profile = %resolved.profile.key,
        source = %resolved.source,
        overall_score,
        "scored trip"
    );

    TripPossibilityResult {
        overall_score,
        percentage: overall_score,
        status,
        status_label: status.label().to_string(),
        breakdown,
        issues,
        confidence,
        profile: resolved.profile.key.clone(),
    }
}

fn to_category_score(category: Category, raw: RawScore) -> CategoryScore {
    debug_assert!(raw.value.is_finite(), "{category} produced a non-finite score");
    let max = category.max_points();
    let score = if raw.value.is_finite() {
        raw.value.round().clamp(0.0, f64::from(max)) as u32
    } else {
        0
    };
    CategoryScore {
        score,
        max,
        details: raw.details,
    }
}

fn missing_signals(trip: &TripData, source: ProfileSource) -> usize {
    [
        !trip.has_dates(),
        !trip.budget.is_finite() || trip.budget <= 0.0,
        trip.activity_count() == 0,
        source == ProfileSource::Fallback,
    ]
    .into_iter()
    .filter(|missing| *missing)
    .count()
}
