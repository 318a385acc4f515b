use crate::domain::TransitionKind::{Enter, Exit};
use crate::domain::{ContainmentState, GeoPoint, Geofence, TransitionEvent};
use chrono::{DateTime, Utc};

#[derive(Debug, PartialEq)]
pub struct Evaluation {
    pub events: Vec<TransitionEvent>,
    pub state: ContainmentState,
}

/// Evaluates `position` against every fence and returns the transitions relative to `prior` together
/// with the containment state that replaces it.
///
/// Each fence is evaluated independently of the others. Ids in `prior` without a matching fence are
/// carried over as is.
pub fn evaluate(position: &GeoPoint, fences: &[Geofence], prior: &ContainmentState, timestamp: DateTime<Utc>) -> Evaluation {
    let mut state = prior.clone();
    let mut events = Vec::new();

    for fence in fences {
        match (fence.contains(position), prior.contains(fence.id)) {
            (true, false) => {
                state.insert(fence.id);
                events.push(TransitionEvent::new(fence, Enter, timestamp));
            }
            (false, true) => {
                state.remove(fence.id);
                events.push(TransitionEvent::new(fence, Exit, timestamp));
            }
            _ => {}
        }
    }

    Evaluation { events, state }
}
