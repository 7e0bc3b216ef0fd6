use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A driver's advertised return-trip capacity.
///
/// Routes are append-only: once posted they are never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub driver_id: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub capacity: String,
    pub vehicle_type: String,
}

/// Input for posting a new route. The id and owning driver are filled in
/// by the route store from the posting session.
#[derive(Debug, Clone)]
pub struct RouteDraft {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub capacity: String,
    pub vehicle_type: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("{} -> {}", self.origin, self.destination);
        writeln!(f, "{}", title)?;
        writeln!(f, "{}", "=".repeat(title.len()))?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Capacity: {}", self.capacity)?;
        writeln!(f, "Vehicle: {}", self.vehicle_type)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_route() -> Route {
        Route {
            id: "r1".to_string(),
            driver_id: "d1".to_string(),
            origin: "Chennai".to_string(),
            destination: "Bangalore".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            capacity: "20 tons".to_string(),
            vehicle_type: "Heavy Truck".to_string(),
        }
    }

    #[test]
    fn test_route_json_shape() {
        let json = serde_json::to_value(sample_route()).unwrap();

        assert_eq!(json["driverId"], "d1");
        assert_eq!(json["vehicleType"], "Heavy Truck");
        // Dates persist as plain ISO strings
        assert_eq!(json["date"], "2025-05-15");
    }

    #[test]
    fn test_route_json_roundtrip() {
        let route = sample_route();
        let json = serde_json::to_string(&route).unwrap();
        let parsed: Route = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, route.id);
        assert_eq!(parsed.date, route.date);
        assert_eq!(parsed.capacity, "20 tons");
    }

    #[test]
    fn test_display() {
        let text = format!("{}", sample_route());
        assert!(text.contains("Chennai -> Bangalore"));
        assert!(text.contains("Date: 2025-05-15"));
        assert!(text.contains("Capacity: 20 tons"));
    }
}
