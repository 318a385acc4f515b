use crate::domain::GeoPoint;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single GPS reading as delivered by the position feed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn deserializes_a_fix_with_a_timestamp() {
        let fix: PositionFix = serde_json::from_value(json!({
            "latitude": 28.50573,
            "longitude": 77.41006,
            "timestamp": "2026-10-14T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(
            fix,
            PositionFix {
                latitude: 28.50573,
                longitude: 77.41006,
                timestamp: Utc.with_ymd_and_hms(2026, 10, 14, 8, 30, 0).unwrap(),
            }
        );
    }

    #[test]
    fn defaults_a_missing_timestamp_to_now() {
        let before = Utc::now();
        let fix: PositionFix = serde_json::from_value(json!({ "latitude": 1.0, "longitude": 2.0 })).unwrap();

        assert!(fix.timestamp >= before);
        assert_eq!(fix.position(), GeoPoint::new(1.0, 2.0));
    }
}
