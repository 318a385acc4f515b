use crate::domain::{Geofence, GeofenceId};
use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Enter,
    Exit,
}

impl Display for TransitionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Enter => write!(f, "checked in"),
            TransitionKind::Exit => write!(f, "moved away"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionEvent {
    pub geofence_id: GeofenceId,
    pub geofence_name: String,
    pub kind: TransitionKind,
    pub timestamp: DateTime<Utc>,
}

impl TransitionEvent {
    pub fn new(geofence: &Geofence, kind: TransitionKind, timestamp: DateTime<Utc>) -> Self {
        TransitionEvent {
            geofence_id: geofence.id,
            geofence_name: geofence.name.clone(),
            kind,
            timestamp,
        }
    }
}
