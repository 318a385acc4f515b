mod file_store;
mod key_value_store;
mod memory_store;

pub use file_store::FileStore;
pub use key_value_store::{KeyValueStore, StorageError};
pub use memory_store::MemoryStore;

/// Keys shared between the components persisting into the store.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const ATTENDANCE_CHECKED: &str = "attendanceChecked";
    pub const CHECK_IN_TIME: &str = "checkInTime";
    pub const CHECK_OUT_TIME: &str = "checkOutTime";
    pub const LOCATIONS: &str = "locations";
}
