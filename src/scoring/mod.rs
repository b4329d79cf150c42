pub mod categories;
pub mod evaluator;
pub mod issues;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub const BUDGET_MAX: u32 = 30;
pub const ACTIVITY_MAX: u32 = 25;
pub const TIME_MAX: u32 = 20;
pub const TRAVEL_FLOW_MAX: u32 = 15;
pub const DURATION_MAX: u32 = 10;

pub const EXCELLENT_THRESHOLD: u32 = 85;
pub const GOOD_THRESHOLD: u32 = 70;
pub const MODERATE_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Budget,
    Activity,
    Time,
    TravelFlow,
    Duration,
}

impl Category {
    /// Declaration order; also the issue tie-break order.
    pub const ALL: [Category; 5] = [
        Category::Budget,
        Category::Activity,
        Category::Time,
        Category::TravelFlow,
        Category::Duration,
    ];

    pub fn max_points(self) -> u32 {
        match self {
            Self::Budget => BUDGET_MAX,
            Self::Activity => ACTIVITY_MAX,
            Self::Time => TIME_MAX,
            Self::TravelFlow => TRAVEL_FLOW_MAX,
            Self::Duration => DURATION_MAX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Activity => "Activity load",
            Self::Time => "Time realism",
            Self::TravelFlow => "Travel flow",
            Self::Duration => "Duration",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryScore {
    pub score: u32,
    pub max: u32,
    pub details: Vec<String>,
}

impl CategoryScore {
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PossibilityBreakdown {
    pub budget_score: CategoryScore,
    pub activity_score: CategoryScore,
    pub time_score: CategoryScore,
    pub travel_flow_score: CategoryScore,
    pub duration_score: CategoryScore,
}

impl PossibilityBreakdown {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Budget => &self.budget_score,
            Category::Activity => &self.activity_score,
            Category::Time => &self.time_score,
            Category::TravelFlow => &self.travel_flow_score,
            Category::Duration => &self.duration_score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryScore)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, s)| s.score.min(s.max)).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityStatus {
    Excellent,
    Good,
    Moderate,
    Risky,
}

impl FeasibilityStatus {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if percentage >= GOOD_THRESHOLD {
            Self::Good
        } else if percentage >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Risky
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Highly Feasible",
            Self::Good => "Feasible",
            Self::Moderate => "Needs Adjustment",
            Self::Risky => "High Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_missing_signals(missing: usize) -> Self {
        match missing {
            0 => Self::High,
            1 => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripPossibilityResult {
    pub overall_score: u32,
    pub percentage: u32,
    pub status: FeasibilityStatus,
    pub status_label: String,
    pub breakdown: PossibilityBreakdown,
    pub issues: Vec<Issue>,
    pub confidence: Confidence,
    /// Key of the destination profile the score was computed against.
    pub profile: String,
}

impl TripPossibilityResult {
    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }

    /// Lowest-ratio category among `candidates`; declaration order breaks ties.
    pub fn weakest_category(&self, candidates: &[Category]) -> Option<Category> {
        let mut weakest: Option<(Category, f64)> = None;
        for category in Category::ALL {
            if !candidates.contains(&category) {
                continue;
            }
            let ratio = self.breakdown.get(category).ratio();
            if weakest.map(|(_, best)| ratio < best).unwrap_or(true) {
                weakest = Some((category, ratio));
            }
        }
        weakest.map(|(category, _)| category)
    }
}

#[cfg(test)]
mod tests {
    use crate::scoring::{Category, Confidence, FeasibilityStatus};

    #[test]
    fn status_thresholds_are_exact() {
        let cases = [
            (100, FeasibilityStatus::Excellent),
            (85, FeasibilityStatus::Excellent),
            (84, FeasibilityStatus::Good),
            (70, FeasibilityStatus::Good),
            (69, FeasibilityStatus::Moderate),
            (50, FeasibilityStatus::Moderate),
            (49, FeasibilityStatus::Risky),
            (0, FeasibilityStatus::Risky),
        ];
        for (percentage, expected) in cases {
            assert_eq!(FeasibilityStatus::from_percentage(percentage), expected);
        }
    }

    #[test]
    fn category_maxima_sum_to_one_hundred() {
        let total: u32 = Category::ALL.iter().map(|c| c.max_points()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn confidence_drops_with_missing_signals() {
        assert_eq!(Confidence::from_missing_signals(0), Confidence::High);
        assert_eq!(Confidence::from_missing_signals(1), Confidence::Medium);
        assert_eq!(Confidence::from_missing_signals(4), Confidence::Low);
    }
}
