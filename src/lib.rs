//! Trip feasibility scoring and optimization.
//!
//! [`scoring`] turns a [`trip::TripData`] into a 0–100 possibility score with
//! a per-category breakdown; [`optimizer`] proposes replayable edits that
//! raise it.

pub mod config;
pub mod optimizer;
pub mod output;
pub mod profiles;
pub mod scoring;
pub mod trip;

pub use config::{Config, OptimizerConfig, ScoringConfig};
pub use optimizer::apply::{apply_changes, ChangeError};
pub use optimizer::generator::{can_optimize, OptimizationGenerator};
pub use optimizer::{ChangeType, OptimizedTrip, StrategyId, TripChange};
pub use profiles::{DestinationProfile, ProfileLookup, ProfileRegistry};
pub use scoring::evaluator::{evaluate_trip, FeasibilityScorer};
pub use scoring::{
    Category, CategoryScore, Confidence, FeasibilityStatus, Issue, PossibilityBreakdown,
    Severity, TripPossibilityResult,
};
pub use trip::{TravelMode, TripData, TripError};
