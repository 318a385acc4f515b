use crate::domain::GeoPoint;

/// Trigger radius applied to geofences that do not configure one.
pub const DEFAULT_RADIUS_M: f64 = 50.0;

pub type GeofenceId = u32;

/// A circular region around a dealer location.
#[derive(Clone, Debug, PartialEq)]
pub struct Geofence {
    pub id: GeofenceId,
    pub name: String,
    pub center: GeoPoint,
    pub radius_meters: f64,
}

impl Geofence {
    pub fn distance_to(&self, position: &GeoPoint) -> f64 {
        self.center.distance_to(position)
    }

    /// A position exactly on the boundary is outside.
    pub fn contains(&self, position: &GeoPoint) -> bool {
        self.distance_to(position) < self.radius_meters
    }
}
