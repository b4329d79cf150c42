use crate::trip::TripData;

pub fn normalize_budget(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

pub fn normalize_currency(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "USD".to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

pub fn normalize_trip(trip: &mut TripData) {
    trip.destination = trip.destination.trim().to_string();
    trip.category = trip
        .category
        .take()
        .map(|c| c.trim().to_ascii_lowercase().replace([' ', '-'], "_"))
        .filter(|c| !c.is_empty());
    trip.budget = normalize_budget(trip.budget);
    trip.currency = normalize_currency(&trip.currency);
    trip.rest_days.sort_unstable();
    trip.rest_days.dedup();
}

#[cfg(test)]
mod tests {
    use crate::trip::normalize::{normalize_budget, normalize_trip};
    use crate::trip::TripData;

    #[test]
    fn clamps_invalid_budgets() {
        assert_eq!(normalize_budget(f64::NAN), 0.0);
        assert_eq!(normalize_budget(f64::INFINITY), 0.0);
        assert_eq!(normalize_budget(-50.0), 0.0);
        assert_eq!(normalize_budget(900.0), 900.0);
    }

    #[test]
    fn normalizes_text_fields() {
        let mut trip = TripData::new("  Paris ")
            .with_budget(1000.0, " eur ")
            .with_category("Major City")
            .with_rest_days(vec![3, 1, 3]);
        normalize_trip(&mut trip);
        assert_eq!(trip.destination, "Paris");
        assert_eq!(trip.currency, "EUR");
        assert_eq!(trip.category.as_deref(), Some("major_city"));
        assert_eq!(trip.rest_days, vec![1, 3]);
    }
}
