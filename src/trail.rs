use crate::domain::{GeoPoint, PositionFix};
use crate::storage::{KeyValueStore, StorageError, keys};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<&PositionFix> for TrailEntry {
    fn from(fix: &PositionFix) -> Self {
        TrailEntry {
            latitude: fix.latitude,
            longitude: fix.longitude,
            timestamp: fix.timestamp,
        }
    }
}

/// The persisted path walked by the agent, capped to the most recent `capacity` entries.
#[derive(Debug)]
pub struct LocationTrail {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    entries: VecDeque<TrailEntry>,
}

impl LocationTrail {
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn KeyValueStore>, capacity: usize) -> Result<Self, TrailError> {
        if capacity == 0 {
            return Err(TrailError::InvalidCapacity);
        }

        let mut entries = match store.get(keys::LOCATIONS).await? {
            Some(json) => serde_json::from_str::<VecDeque<TrailEntry>>(&json).map_err(StorageError::from)?,
            None => VecDeque::new(),
        };

        if entries.len() > capacity {
            let excess = entries.len() - capacity;
            warn!("⚠️ Stored trail holds {} entries, keeping the newest {}", entries.len(), capacity);
            entries.drain(..excess);
        }

        debug!("🗺️ Loaded trail with {} entries", entries.len());
        Ok(LocationTrail { store, capacity, entries })
    }

    /// Appends `entry`, evicting the oldest entry when the trail is full, and persists the trail.
    ///
    /// The entry is kept in memory even if persisting fails.
    pub async fn append(&mut self, entry: TrailEntry) -> Result<(), TrailError> {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);

        let json = serde_json::to_string(&self.entries).map_err(StorageError::from)?;
        self.store.set(keys::LOCATIONS, json).await?;
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &TrailEntry> {
        self.entries.iter()
    }

    /// The walked path, oldest position first.
    pub fn path(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.entries.iter().map(|e| GeoPoint::new(e.latitude, e.longitude))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Error, Debug)]
pub enum TrailError {
    #[error("trail capacity must be at least 1")]
    InvalidCapacity,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
