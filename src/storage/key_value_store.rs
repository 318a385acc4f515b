use async_trait::async_trait;
use std::fmt::Debug;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// String-keyed persistent storage for the session, attendance and trail.
#[async_trait]
pub trait KeyValueStore: Debug + Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Removes every key.
    async fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("could not access '{}': {}", path.display(), source)]
    Io { source: io::Error, path: PathBuf },
    #[error("could not (de)serialize the store: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corrupt value '{value}' for key '{key}'")]
    Corrupt { key: String, value: String },
}
