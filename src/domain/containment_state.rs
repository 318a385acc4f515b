use crate::domain::GeofenceId;
use std::collections::BTreeSet;

/// The geofences a tracked agent is inside as of the last evaluation.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ContainmentState {
    inside: BTreeSet<GeofenceId>,
}

impl ContainmentState {
    pub fn new() -> Self {
        ContainmentState::default()
    }

    pub fn contains(&self, id: GeofenceId) -> bool {
        self.inside.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GeofenceId> + '_ {
        self.inside.iter().copied()
    }

    pub(crate) fn insert(&mut self, id: GeofenceId) {
        self.inside.insert(id);
    }

    pub(crate) fn remove(&mut self, id: GeofenceId) {
        self.inside.remove(&id);
    }
}

impl FromIterator<GeofenceId> for ContainmentState {
    fn from_iter<I: IntoIterator<Item = GeofenceId>>(iter: I) -> Self {
        ContainmentState {
            inside: iter.into_iter().collect(),
        }
    }
}
