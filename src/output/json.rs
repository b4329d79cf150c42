use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON in the camelCase shape the trip UI consumes.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed serializing output as JSON")
}

#[cfg(test)]
mod tests {
    use crate::output::json::render_json;
    use crate::trip::TripData;

    #[test]
    fn trip_renders_with_camel_case_keys() {
        let trip = TripData::new("Paris").with_daily_loads(vec![2, 3]);
        let rendered = render_json(&trip).expect("trip should render");
        assert!(rendered.contains("\"plannedActivities\": 5"));
        assert!(rendered.contains("\"dailyLoads\""));
        assert!(rendered.contains("\"travelMode\": \"transit\""));
    }
}
