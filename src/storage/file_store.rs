use crate::storage::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

type Values = BTreeMap<String, String>;

/// Keeps all keys in a single JSON object file. A missing file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Values, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Values::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Values::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn write(&self, values: &Values) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
        }

        // Readers never observe a partially written store
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(values)?).await.map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| self.io_error(e))?;
        debug!("💾 Wrote {} key(s)", values.len());
        Ok(())
    }

    async fn update<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Values) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut values = self.read().await?;
        f(&mut values);
        self.write(&values).await
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            source,
            path: self.path.clone(),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.remove(key);
        })
        .await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.update(|values| values.clear()).await
    }
}
