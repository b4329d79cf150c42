use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::optimizer::OptimizedTrip;
use crate::profiles::{DestinationProfile, ProfileRegistry};
use crate::scoring::{Confidence, FeasibilityStatus, Severity, TripPossibilityResult};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn status_color(status: FeasibilityStatus) -> Color {
    match status {
        FeasibilityStatus::Excellent => Color::Green,
        FeasibilityStatus::Good => Color::Cyan,
        FeasibilityStatus::Moderate => Color::Yellow,
        FeasibilityStatus::Risky => Color::Red,
    }
}

pub fn render_result_table(result: &TripPossibilityResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Score", "Status", "Confidence", "Profile", "Issues"]);
    let confidence = match result.confidence {
        Confidence::High => "high",
        Confidence::Medium => "medium",
        Confidence::Low => "low",
    };
    table.add_row(Row::from(vec![
        Cell::new(format!("{}%", result.percentage)),
        Cell::new(&result.status_label).fg(status_color(result.status)),
        Cell::new(confidence),
        Cell::new(&result.profile),
        Cell::new(format!(
            "{} ({} critical)",
            result.issues.len(),
            result.critical_count()
        )),
    ]));
    table.to_string()
}

pub fn render_breakdown_table(result: &TripPossibilityResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Category", "Score", "Details"]);
    for (category, score) in result.breakdown.iter() {
        table.add_row(vec![
            category.label().to_string(),
            format!("{}/{}", score.score, score.max),
            score.details.join("\n"),
        ]);
    }
    table.to_string()
}

pub fn render_issues_table(result: &TripPossibilityResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Severity", "Category", "Issue"]);
    for issue in &result.issues {
        let (label, color) = match issue.severity {
            Severity::Critical => ("CRITICAL", Color::Red),
            Severity::Warning => ("WARNING", Color::Yellow),
            Severity::Info => ("INFO", Color::Blue),
        };
        table.add_row(Row::from(vec![
            Cell::new(label).fg(color),
            Cell::new(issue.category.label()),
            Cell::new(&issue.message),
        ]));
    }
    table.to_string()
}

pub fn render_plans_table(plans: &[OptimizedTrip]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Plan",
        "Score",
        "Improvement",
        "Changes",
        "Tradeoffs",
    ]);
    for plan in plans {
        table.add_row(Row::from(vec![
            Cell::new(format!("{} {}", plan.icon, plan.name)),
            Cell::new(format!("{}%", plan.possibility.percentage))
                .fg(status_color(plan.possibility.status)),
            Cell::new(format!("+{}", plan.improvement_percentage)).fg(Color::Green),
            Cell::new(plan.changes.len()),
            Cell::new(plan.tradeoffs.join("\n")),
        ]));
    }
    table.to_string()
}

pub fn render_changes_table(plan: &OptimizedTrip) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Change", "Impact"]);
    for (idx, change) in plan.changes.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            change.description.clone(),
            change.impact.clone(),
        ]);
    }
    table.to_string()
}

pub fn render_profiles_table(registry: &ProfileRegistry) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Profile",
        "Kind",
        "Daily Base",
        "Per Activity",
        "Sweet Spot",
        "Ideal Days",
    ]);
    let rows = registry
        .destinations()
        .iter()
        .map(|p| (p, "destination"))
        .chain(registry.categories().iter().map(|p| (p, "category")))
        .chain(std::iter::once((registry.fallback(), "fallback")));
    for (profile, kind) in rows {
        table.add_row(profile_row(profile, kind));
    }
    table.to_string()
}

fn profile_row(profile: &DestinationProfile, kind: &str) -> Vec<String> {
    vec![
        profile.display_name().to_string(),
        kind.to_string(),
        format!("{:.0} {}", profile.daily_base_cost, profile.currency),
        format!("{:.0} {}", profile.activity_cost, profile.currency),
        format!("{:.0}-{:.0}", profile.sweet_spot_min, profile.sweet_spot_max),
        format!("{}-{}", profile.ideal_min_days, profile.ideal_max_days),
    ]
}
