use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::optimizer::strategies::Proposal;
use crate::optimizer::{ChangeType, OptimizedTrip, StrategyId, TripChange};
use crate::profiles::DestinationProfile;
use crate::scoring::TripPossibilityResult;

/// A scored strategy proposal awaiting ranking.
#[derive(Debug, Clone)]
pub struct PlanCandidate {
    pub id: StrategyId,
    pub proposal: Proposal,
    pub possibility: TripPossibilityResult,
    pub improvement: i32,
}

/// Keeps strictly improving candidates, best first, and drops any whose
/// resulting trip duplicates a better-ranked one.
pub fn rank_plans(
    mut candidates: Vec<PlanCandidate>,
    profile: &DestinationProfile,
    currency: &str,
    max_tradeoffs: usize,
) -> Vec<OptimizedTrip> {
    candidates.retain(|c| c.improvement > 0);
    candidates.sort_by_key(|c| (Reverse(c.improvement), c.id));

    let mut seen = BTreeSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.proposal.trip.fingerprint()))
        .map(|c| {
            let tradeoffs =
                build_tradeoffs(c.id, &c.proposal.changes, profile, currency, max_tradeoffs);
            let description = match c.proposal.focus {
                Some(focus) => format!("{} Focus: {}.", c.id.description(), focus.label()),
                None => c.id.description().to_string(),
            };
            OptimizedTrip {
                id: c.id,
                name: c.id.name().to_string(),
                icon: c.id.icon().to_string(),
                description,
                possibility: c.possibility,
                improvement_percentage: c.improvement,
                tradeoffs,
                changes: c.proposal.changes,
                trip: c.proposal.trip,
            }
        })
        .collect()
}

pub fn build_tradeoffs(
    id: StrategyId,
    changes: &[TripChange],
    profile: &DestinationProfile,
    currency: &str,
    max_items: usize,
) -> Vec<String> {
    let count = |kind: ChangeType| -> u32 {
        changes
            .iter()
            .filter(|c| c.change_type == kind)
            .map(|c| c.count)
            .sum()
    };
    let removed = count(ChangeType::RemoveActivity);
    let merged = count(ChangeType::MergeActivities);
    let rested = count(ChangeType::AddRest);
    let moved = count(ChangeType::MoveActivity);

    let mut tradeoffs = Vec::new();
    if removed > 0 {
        tradeoffs.push(format!("Drops {removed} {}", plural(removed, "activity", "activities")));
    }
    if merged > 0 {
        tradeoffs.push(format!(
            "Combines {merged} {} of activities into shared outings",
            plural(merged, "pair", "pairs")
        ));
    }
    if rested > 0 {
        tradeoffs.push(format!("Adds {rested} rest {}", plural(rested, "day", "days")));
    }
    if moved > 0 {
        tradeoffs.push(format!(
            "Reshuffles {moved} {} between days",
            plural(moved, "activity", "activities")
        ));
    }
    match id {
        StrategyId::Relaxed if removed + rested > 0 => {
            tradeoffs.push("Slower pace with fewer sights per day".to_string());
        }
        StrategyId::Budget if removed + merged > 0 => {
            let saved = f64::from(removed + merged) * profile.activity_cost;
            tradeoffs.push(format!("Saves about {saved:.0} {currency} in activity costs"));
        }
        _ => {}
    }

    tradeoffs.truncate(max_items);
    tradeoffs
}

fn plural(n: u32, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ScoringConfig;
    use crate::optimizer::ranking::{build_tradeoffs, rank_plans, PlanCandidate};
    use crate::optimizer::strategies::Proposal;
    use crate::optimizer::{StrategyId, TripChange};
    use crate::profiles::{DestinationProfile, ProfileRegistry};
    use crate::scoring::evaluator::FeasibilityScorer;
    use crate::scoring::TripPossibilityResult;
    use crate::trip::TripData;

    fn paris() -> DestinationProfile {
        ProfileRegistry::with_defaults()
            .expect("defaults should load")
            .by_destination("paris")
            .cloned()
            .expect("paris profile")
    }

    fn possibility(trip: &TripData) -> TripPossibilityResult {
        let registry = ProfileRegistry::with_defaults().expect("defaults should load");
        let settings = ScoringConfig::default();
        FeasibilityScorer::new(&registry, &settings)
            .score(trip)
            .expect("trip should score")
    }

    fn candidate(id: StrategyId, loads: Vec<u32>, improvement: i32) -> PlanCandidate {
        let trip = TripData::new("Paris").with_daily_loads(loads);
        PlanCandidate {
            id,
            possibility: possibility(&trip),
            proposal: Proposal {
                trip,
                changes: vec![TripChange::remove_activity(0, 1)],
                focus: None,
            },
            improvement,
        }
    }

    #[test]
    fn ranks_by_improvement_then_strategy_order() {
        let plans = rank_plans(
            vec![
                candidate(StrategyId::Budget, vec![2, 2], 10),
                candidate(StrategyId::Relaxed, vec![3, 2], 25),
                candidate(StrategyId::Balanced, vec![1, 2], 10),
            ],
            &paris(),
            "USD",
            3,
        );
        let ids: Vec<StrategyId> = plans.iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![StrategyId::Relaxed, StrategyId::Balanced, StrategyId::Budget]
        );
        assert_eq!(plans[0].name, "Relaxed Pace");
        assert_eq!(plans[0].improvement_percentage, 25);
    }

    #[test]
    fn drops_non_improving_and_duplicate_plans() {
        let plans = rank_plans(
            vec![
                candidate(StrategyId::Balanced, vec![3, 3], 12),
                candidate(StrategyId::Relaxed, vec![3, 3], 12),
                candidate(StrategyId::Budget, vec![2, 2], 0),
            ],
            &paris(),
            "USD",
            3,
        );
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, StrategyId::Balanced);
    }

    #[test]
    fn summarizes_tradeoffs() {
        let changes = vec![
            TripChange::merge_activities(0, 2),
            TripChange::remove_activity(1, 1),
            TripChange::move_activity(2, 3, 2),
            TripChange::add_rest(2),
        ];
        let tradeoffs = build_tradeoffs(StrategyId::Budget, &changes, &paris(), "EUR", 10);
        assert_eq!(
            tradeoffs,
            vec![
                "Drops 1 activity",
                "Combines 2 pairs of activities into shared outings",
                "Adds 1 rest day",
                "Reshuffles 2 activities between days",
                "Saves about 45 EUR in activity costs",
            ]
        );
        let capped = build_tradeoffs(StrategyId::Budget, &changes, &paris(), "EUR", 2);
        assert_eq!(capped.len(), 2);
    }
}
