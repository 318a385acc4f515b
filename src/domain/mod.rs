mod containment_state;
pub mod events;
mod geo_point;
mod geofence;
mod position_fix;
mod transition_event;

pub use containment_state::ContainmentState;
pub use geo_point::GeoPoint;
pub use geofence::{DEFAULT_RADIUS_M, Geofence, GeofenceId};
pub use position_fix::PositionFix;
pub use transition_event::{TransitionEvent, TransitionKind};
