use crate::scoring::{Category, Issue, PossibilityBreakdown, Severity};

const CRITICAL_RATIO: f64 = 0.5;
const WARNING_RATIO: f64 = 0.75;
const NEAR_PERFECT_RATIO: f64 = 0.9;

pub fn classify_issues(breakdown: &PossibilityBreakdown) -> Vec<Issue> {
    let mut issues: Vec<Issue> = breakdown
        .iter()
        .filter_map(|(category, score)| {
            let severity = classify_ratio(score.ratio())?;
            Some(Issue {
                severity,
                category,
                message: issue_message(category, severity).to_string(),
            })
        })
        .collect();
    // stable: category declaration order survives within a severity
    issues.sort_by_key(|issue| issue.severity);
    issues
}

pub fn classify_ratio(ratio: f64) -> Option<Severity> {
    if ratio < CRITICAL_RATIO {
        Some(Severity::Critical)
    } else if ratio < WARNING_RATIO {
        Some(Severity::Warning)
    } else if (NEAR_PERFECT_RATIO..1.0).contains(&ratio) {
        Some(Severity::Info)
    } else {
        None
    }
}

fn issue_message(category: Category, severity: Severity) -> &'static str {
    match (category, severity) {
        (Category::Budget, Severity::Critical) => {
            "Budget covers well under the expected cost of this trip"
        }
        (Category::Budget, Severity::Warning) => "Budget is tight for the planned itinerary",
        (Category::Budget, Severity::Info) => "Budget is nearly sufficient",
        (Category::Activity, Severity::Critical) => {
            "Activity load is far outside the sustainable range"
        }
        (Category::Activity, Severity::Warning) => {
            "Activity load is outside the comfortable range"
        }
        (Category::Activity, Severity::Info) => "Activity load is nearly balanced",
        (Category::Time, Severity::Critical) => "Daily schedule exceeds realistic waking hours",
        (Category::Time, Severity::Warning) => "Some days are tightly scheduled",
        (Category::Time, Severity::Info) => "Schedule is nearly comfortable",
        (Category::TravelFlow, Severity::Critical) => {
            "Too many area changes for the trip length"
        }
        (Category::TravelFlow, Severity::Warning) => "Frequent area changes fragment the trip",
        (Category::TravelFlow, Severity::Info) => "Travel flow is nearly seamless",
        (Category::Duration, Severity::Critical) => {
            "Trip length is far from the recommended duration"
        }
        (Category::Duration, Severity::Warning) => "Trip length is outside the ideal range",
        (Category::Duration, Severity::Info) => "Trip length is close to ideal",
    }
}

#[cfg(test)]
mod tests {
    use crate::scoring::issues::{classify_issues, classify_ratio};
    use crate::scoring::{Category, CategoryScore, PossibilityBreakdown, Severity};

    fn score(score: u32, max: u32) -> CategoryScore {
        CategoryScore {
            score,
            max,
            details: Vec::new(),
        }
    }

    #[test]
    fn classifies_ratio_bands() {
        assert_eq!(classify_ratio(0.0), Some(Severity::Critical));
        assert_eq!(classify_ratio(0.49), Some(Severity::Critical));
        assert_eq!(classify_ratio(0.5), Some(Severity::Warning));
        assert_eq!(classify_ratio(0.74), Some(Severity::Warning));
        assert_eq!(classify_ratio(0.75), None);
        assert_eq!(classify_ratio(0.93), Some(Severity::Info));
        assert_eq!(classify_ratio(1.0), None);
    }

    #[test]
    fn orders_by_severity_then_category() {
        let breakdown = PossibilityBreakdown {
            budget_score: score(20, 30),
            activity_score: score(5, 25),
            time_score: score(19, 20),
            travel_flow_score: score(10, 15),
            duration_score: score(2, 10),
        };
        let issues = classify_issues(&breakdown);
        let order: Vec<(Severity, Category)> =
            issues.iter().map(|i| (i.severity, i.category)).collect();
        assert_eq!(
            order,
            vec![
                (Severity::Critical, Category::Activity),
                (Severity::Critical, Category::Duration),
                (Severity::Warning, Category::Budget),
                (Severity::Warning, Category::TravelFlow),
                (Severity::Info, Category::Time),
            ]
        );
    }

    #[test]
    fn perfect_breakdown_has_no_issues() {
        let breakdown = PossibilityBreakdown {
            budget_score: score(30, 30),
            activity_score: score(25, 25),
            time_score: score(20, 20),
            travel_flow_score: score(15, 15),
            duration_score: score(10, 10),
        };
        assert!(classify_issues(&breakdown).is_empty());
    }
}
