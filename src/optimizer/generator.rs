use tracing::{info, warn};

use crate::config::OptimizerConfig;
use crate::optimizer::apply::apply_changes;
use crate::optimizer::ranking::{rank_plans, PlanCandidate};
use crate::optimizer::strategies::{Proposal, StrategyContext};
use crate::optimizer::{OptimizedTrip, StrategyId, StrategyParseError};
use crate::scoring::evaluator::FeasibilityScorer;
use crate::scoring::{TripPossibilityResult, EXCELLENT_THRESHOLD};
use crate::trip::{TripData, TripError};

/// Trips scoring below the excellent band are worth optimizing.
pub fn can_optimize(result: &TripPossibilityResult) -> bool {
    result.percentage < EXCELLENT_THRESHOLD
}

/// Runs each enabled strategy against a trip and ranks the plans that
/// strictly improve on it.
pub struct OptimizationGenerator<'a> {
    scorer: FeasibilityScorer<'a>,
    strategies: Vec<StrategyId>,
    max_tradeoffs: usize,
}

impl<'a> OptimizationGenerator<'a> {
    pub fn new(scorer: FeasibilityScorer<'a>) -> Self {
        Self {
            scorer,
            strategies: StrategyId::ALL.to_vec(),
            max_tradeoffs: 3,
        }
    }

    pub fn from_config(
        scorer: FeasibilityScorer<'a>,
        config: &OptimizerConfig,
    ) -> Result<Self, StrategyParseError> {
        let mut strategies = Vec::with_capacity(config.strategies.len());
        for raw in &config.strategies {
            let id: StrategyId = raw.parse()?;
            if !strategies.contains(&id) {
                strategies.push(id);
            }
        }
        Ok(Self {
            scorer,
            strategies,
            max_tradeoffs: config.max_tradeoffs,
        })
    }

    pub fn strategies(&self) -> &[StrategyId] {
        &self.strategies
    }

    /// Generates ranked plans for `trip`, whose current score is `result`.
    ///
    /// Returns an empty list when the trip is already excellent or no
    /// strategy finds a strictly better variant.
    pub fn generate(
        &self,
        trip: &TripData,
        result: &TripPossibilityResult,
    ) -> Result<Vec<OptimizedTrip>, TripError> {
        trip.validate()?;
        if !can_optimize(result) {
            info!(
                destination = %trip.destination,
                percentage = result.percentage,
                "trip already highly feasible; no plans generated"
            );
            return Ok(Vec::new());
        }

        let resolved = self.scorer.resolve(trip);
        let ctx = StrategyContext {
            trip,
            result,
            profile: &resolved.profile,
            settings: self.scorer.settings(),
        };

        let mut candidates = Vec::with_capacity(self.strategies.len());
        for id in &self.strategies {
            let proposal = match id.propose(&ctx) {
                Ok(proposal) => proposal,
                Err(err) => {
                    if cfg!(debug_assertions) {
                        panic!("strategy {id} produced an unreplayable change: {err}");
                    }
                    warn!(strategy = %id, error = %err, "skipping strategy");
                    continue;
                }
            };
            if proposal.changes.is_empty() {
                continue;
            }
            if let Some(candidate) = self.score_proposal(*id, trip, result, proposal)? {
                candidates.push(candidate);
            }
        }

        let plans = rank_plans(
            candidates,
            &resolved.profile,
            &trip.currency,
            self.max_tradeoffs,
        );
        info!(
            destination = %trip.destination,
            baseline = result.percentage,
            plans = plans.len(),
            "generated optimization plans"
        );
        Ok(plans)
    }

    fn score_proposal(
        &self,
        id: StrategyId,
        trip: &TripData,
        result: &TripPossibilityResult,
        proposal: Proposal,
    ) -> Result<Option<PlanCandidate>, TripError> {
        // score what replaying the log yields, not the strategy's own copy
        let replayed = match apply_changes(trip, &proposal.changes) {
            Ok(replayed) => replayed,
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("strategy {id} change log failed to replay: {err}");
                }
                warn!(strategy = %id, error = %err, "skipping strategy");
                return Ok(None);
            }
        };
        let possibility = self.scorer.score(&replayed)?;
        let improvement = possibility.percentage as i32 - result.percentage as i32;
        if improvement <= 0 {
            info!(strategy = %id, improvement, "plan does not improve trip; dropped");
            return Ok(None);
        }
        Ok(Some(PlanCandidate {
            id,
            proposal: Proposal {
                trip: replayed,
                ..proposal
            },
            possibility,
            improvement,
        }))
    }
}
