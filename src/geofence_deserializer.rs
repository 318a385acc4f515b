use crate::domain::{DEFAULT_RADIUS_M, GeoPoint, Geofence, GeofenceId};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for Geofence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            id: GeofenceId,
            name: String,
            latitude: f64,
            longitude: f64,
            radius_m: Option<f64>,
        }

        let inner = Inner::deserialize(deserializer)?;
        let center = validated_point::<D::Error>(inner.latitude, inner.longitude)?;

        let radius_meters = inner.radius_m.unwrap_or(DEFAULT_RADIUS_M);
        if !(radius_meters.is_finite() && radius_meters > 0.0) {
            return Err(Error::custom(format!("invalid radius for geofence '{}': {}, must be positive", inner.name, radius_meters)));
        }

        Ok(Geofence {
            id: inner.id,
            name: inner.name,
            center,
            radius_meters,
        })
    }
}

fn validated_point<E: Error>(latitude: f64, longitude: f64) -> Result<GeoPoint, E> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::custom(format!("invalid latitude: {}, must be between -90 and 90", latitude)));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::custom(format!("invalid longitude: {}, must be between -180 and 180", longitude)));
    }

    Ok(GeoPoint::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[test]
    fn deserializes_a_geofence_with_a_radius() {
        let fence: Geofence = serde_json::from_value(json!({
            "id": 2,
            "name": "Dealer 2",
            "latitude": 28.507681,
            "longitude": 77.409081,
            "radius_m": 75.0
        }))
        .unwrap();

        assert_eq!(
            fence,
            Geofence {
                id: 2,
                name: "Dealer 2".to_string(),
                center: GeoPoint::new(28.507681, 77.409081),
                radius_meters: 75.0,
            }
        );
    }

    #[test]
    fn a_geofence_without_a_radius_gets_the_default() {
        let fence: Geofence = serde_json::from_value(json!({
            "id": 1,
            "name": "Dealer 1",
            "latitude": 28.50573,
            "longitude": 77.41006
        }))
        .unwrap();

        assert_eq!(fence.radius_meters, DEFAULT_RADIUS_M);
    }

    #[rstest]
    #[case::zero_radius(json!({ "id": 1, "name": "Dealer 1", "latitude": 0.0, "longitude": 0.0, "radius_m": 0.0 }), "invalid radius for geofence 'Dealer 1'")]
    #[case::negative_radius(json!({ "id": 1, "name": "Dealer 1", "latitude": 0.0, "longitude": 0.0, "radius_m": -5.0 }), "must be positive")]
    #[case::latitude_too_high(json!({ "id": 1, "name": "Dealer 1", "latitude": 90.5, "longitude": 0.0 }), "invalid latitude: 90.5")]
    #[case::latitude_too_low(json!({ "id": 1, "name": "Dealer 1", "latitude": -91.0, "longitude": 0.0 }), "invalid latitude: -91")]
    #[case::longitude_too_high(json!({ "id": 1, "name": "Dealer 1", "latitude": 0.0, "longitude": 180.1 }), "invalid longitude: 180.1")]
    #[case::latitude_not_a_number(json!({ "id": 1, "name": "Dealer 1", "latitude": "north", "longitude": 0.0 }), "invalid type")]
    #[case::no_name(json!({ "id": 1, "latitude": 0.0, "longitude": 0.0 }), "missing field `name`")]
    fn rejects_invalid_geofences(#[case] json: Value, #[case] expected_message: &str) {
        let err = serde_json::from_value::<Geofence>(json).expect_err("expected an error but got Ok");
        let msg = err.to_string();
        assert!(msg.contains(expected_message), "Expected error message to contain '{expected_message}', but got '{msg}'");
    }
}
