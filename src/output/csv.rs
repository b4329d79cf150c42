use anyhow::Result;

use crate::optimizer::OptimizedTrip;
use crate::scoring::TripPossibilityResult;

pub fn breakdown_to_csv(result: &TripPossibilityResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["category", "score", "max", "details"])?;
    for (category, score) in result.breakdown.iter() {
        writer.write_record([
            category.label().to_string(),
            score.score.to_string(),
            score.max.to_string(),
            score.details.join("; "),
        ])?;
    }
    writer.write_record([
        "total".to_string(),
        result.overall_score.to_string(),
        "100".to_string(),
        result.status_label.clone(),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn plans_to_csv(plans: &[OptimizedTrip]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "plan",
        "score",
        "improvement",
        "changes",
        "planned_activities",
        "rest_days",
        "tradeoffs",
    ])?;
    for plan in plans {
        writer.write_record([
            plan.id.to_string(),
            plan.possibility.percentage.to_string(),
            plan.improvement_percentage.to_string(),
            plan.changes.len().to_string(),
            plan.trip.planned_activities.to_string(),
            plan.trip.rest_days.len().to_string(),
            plan.tradeoffs.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::config::ScoringConfig;
    use crate::output::csv::breakdown_to_csv;
    use crate::profiles::ProfileRegistry;
    use crate::scoring::evaluator::FeasibilityScorer;
    use crate::trip::TripData;

    #[test]
    fn breakdown_csv_has_one_row_per_category_plus_total() {
        let registry = ProfileRegistry::with_defaults().expect("defaults should load");
        let settings = ScoringConfig::default();
        let trip = TripData::new("Paris")
            .with_dates(
                NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
                NaiveDate::from_ymd_opt(2025, 6, 7).expect("valid date"),
            )
            .with_budget(1400.0, "USD")
            .with_activities(14);
        let result = FeasibilityScorer::new(&registry, &settings)
            .score(&trip)
            .expect("trip should score");

        let csv = breakdown_to_csv(&result).expect("csv should render");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "category,score,max,details");
        assert!(lines[6].starts_with(&format!("total,{},100,", result.overall_score)));
    }
}
