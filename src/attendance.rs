use crate::storage::{KeyValueStore, StorageError, keys};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttendanceStatus {
    /// The agent confirmed attendance at least once since the last logout.
    pub confirmed: bool,
    pub clocked_in_at: Option<DateTime<Utc>>,
    pub clocked_out_at: Option<DateTime<Utc>>,
}

impl AttendanceStatus {
    pub fn is_on_shift(&self) -> bool {
        self.confirmed && self.clocked_out_at.is_none()
    }
}

/// Clock-in and clock-out bookkeeping on top of the key-value store.
#[derive(Debug, Clone)]
pub struct Attendance {
    store: Arc<dyn KeyValueStore>,
}

impl Attendance {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Attendance { store }
    }

    pub async fn status(&self) -> Result<AttendanceStatus, AttendanceError> {
        Ok(AttendanceStatus {
            confirmed: self.store.get(keys::ATTENDANCE_CHECKED).await?.as_deref() == Some("true"),
            clocked_in_at: self.timestamp(keys::CHECK_IN_TIME).await?,
            clocked_out_at: self.timestamp(keys::CHECK_OUT_TIME).await?,
        })
    }

    /// Starts a shift at `now`. A clock-out from a previous shift is discarded.
    #[instrument(skip(self))]
    pub async fn clock_in(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AttendanceError> {
        if self.status().await?.is_on_shift() {
            return Err(AttendanceError::AlreadyClockedIn);
        }

        self.store.set(keys::ATTENDANCE_CHECKED, "true".to_string()).await?;
        self.store.set(keys::CHECK_IN_TIME, to_rfc3339(now)).await?;
        self.store.remove(keys::CHECK_OUT_TIME).await?;
        info!("🕘 Clocked in at {}", now);
        Ok(now)
    }

    #[instrument(skip(self))]
    pub async fn clock_out(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AttendanceError> {
        let status = self.status().await?;
        if status.clocked_out_at.is_some() {
            return Err(AttendanceError::AlreadyClockedOut);
        }
        if status.clocked_in_at.is_none() {
            return Err(AttendanceError::NotClockedIn);
        }

        self.store.set(keys::CHECK_OUT_TIME, to_rfc3339(now)).await?;
        self.store.remove(keys::CHECK_IN_TIME).await?;
        info!("🕔 Clocked out at {}", now);
        Ok(now)
    }

    /// Forgets everything the store holds, including the session token and the trail.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AttendanceError> {
        self.store.clear().await?;
        info!("👋 Logged out");
        Ok(())
    }

    async fn timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        let Some(value) = self.store.get(key).await? else {
            return Ok(None);
        };

        DateTime::parse_from_rfc3339(&value)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| StorageError::Corrupt { key: key.to_string(), value })
    }
}

fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("already clocked in")]
    AlreadyClockedIn,
    #[error("already clocked out")]
    AlreadyClockedOut,
    #[error("not clocked in")]
    NotClockedIn,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn attendance() -> (Attendance, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
        (Attendance::new(store.clone()), store)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn a_fresh_store_is_not_on_shift() -> Result<(), AttendanceError> {
        let (attendance, _) = attendance();

        assert_eq!(attendance.status().await?, AttendanceStatus::default());
        Ok(())
    }

    #[tokio::test]
    async fn clock_in_records_the_time() -> Result<(), AttendanceError> {
        let (attendance, store) = attendance();

        attendance.clock_in(at(8)).await?;

        let status = attendance.status().await?;
        assert!(status.is_on_shift());
        assert_eq!(status.clocked_in_at, Some(at(8)));
        assert_eq!(store.get(keys::CHECK_IN_TIME).await?, Some("2026-10-14T08:00:00.000Z".to_string()));
        assert_eq!(store.get(keys::ATTENDANCE_CHECKED).await?, Some("true".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn clocking_in_twice_fails() -> Result<(), AttendanceError> {
        let (attendance, _) = attendance();
        attendance.clock_in(at(8)).await?;

        let result = attendance.clock_in(at(9)).await;

        assert!(matches!(result, Err(AttendanceError::AlreadyClockedIn)));
        assert_eq!(attendance.status().await?.clocked_in_at, Some(at(8)));
        Ok(())
    }

    #[tokio::test]
    async fn clock_out_replaces_the_clock_in_time() -> Result<(), AttendanceError> {
        let (attendance, _) = attendance();
        attendance.clock_in(at(8)).await?;

        attendance.clock_out(at(17)).await?;

        let status = attendance.status().await?;
        assert!(!status.is_on_shift());
        assert_eq!(status.clocked_in_at, None);
        assert_eq!(status.clocked_out_at, Some(at(17)));
        Ok(())
    }

    #[tokio::test]
    async fn clocking_out_before_clocking_in_fails() {
        let (attendance, _) = attendance();

        let result = attendance.clock_out(at(17)).await;

        assert!(matches!(result, Err(AttendanceError::NotClockedIn)));
    }

    #[tokio::test]
    async fn clocking_out_twice_fails() -> Result<(), AttendanceError> {
        let (attendance, _) = attendance();
        attendance.clock_in(at(8)).await?;
        attendance.clock_out(at(17)).await?;

        let result = attendance.clock_out(at(18)).await;

        assert!(matches!(result, Err(AttendanceError::AlreadyClockedOut)));
        Ok(())
    }

    #[tokio::test]
    async fn a_new_shift_discards_the_previous_clock_out() -> Result<(), AttendanceError> {
        let (attendance, _) = attendance();
        attendance.clock_in(at(8)).await?;
        attendance.clock_out(at(17)).await?;

        attendance.clock_in(at(20)).await?;

        let status = attendance.status().await?;
        assert!(status.is_on_shift());
        assert_eq!(status.clocked_in_at, Some(at(20)));
        assert_eq!(status.clocked_out_at, None);
        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_the_store() -> Result<(), AttendanceError> {
        let (attendance, store) = attendance();
        store.set(keys::TOKEN, "token".to_string()).await?;
        attendance.clock_in(at(8)).await?;

        attendance.logout().await?;

        assert_eq!(store.get(keys::TOKEN).await?, None);
        assert_eq!(attendance.status().await?, AttendanceStatus::default());
        Ok(())
    }

    #[tokio::test]
    async fn a_corrupt_timestamp_is_reported() -> Result<(), AttendanceError> {
        let (attendance, store) = attendance();
        store.set(keys::CHECK_IN_TIME, "yesterday".to_string()).await?;

        let result = attendance.status().await;

        assert!(matches!(result, Err(AttendanceError::Storage(StorageError::Corrupt { .. }))));
        Ok(())
    }
}
