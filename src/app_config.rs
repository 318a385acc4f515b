use crate::domain::Geofence;
use config::{Config, ConfigError};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    auth: Auth,
    #[serde(default)]
    storage: Storage,
    feed: Feed,
    tracking: Tracking,
    geofences: Vec<Geofence>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("FIELDTRACK").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        if let Some(duplicate) = self.geofences.iter().find(|fence| !ids.insert(fence.id)) {
            return Err(ConfigError::Message(format!("duplicate geofence id {}", duplicate.id)));
        }

        if self.tracking.trail_capacity == 0 {
            return Err(ConfigError::Message("tracking.trail_capacity must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn tracking(&self) -> &Tracking {
        &self.tracking
    }

    pub fn geofences(&self) -> &[Geofence] {
        &self.geofences
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    event_buffer_size: usize,
}

impl Core {
    pub fn event_buffer_size(&self) -> usize {
        self.event_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    url: String,
    username: String,
    password: String,
    #[serde(with = "humantime_serde")]
    timeout: Duration,
}

impl Auth {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Storage {
    path: Option<String>,
}

impl Storage {
    /// Without a path the store lives in memory only.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct Feed {
    url: String,
    retry_ms: u64,
    #[serde(with = "humantime_serde")]
    retry_max_delay: Duration,
    #[serde(with = "humantime_serde")]
    stale_connection_timeout: Duration,
    #[serde(with = "humantime_serde")]
    poll_interval: Duration,
}

impl Feed {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn retry_max_delay(&self) -> Duration {
        self.retry_max_delay
    }

    pub fn stale_connection_timeout(&self) -> Duration {
        self.stale_connection_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[derive(Debug, Deserialize)]
pub struct Tracking {
    trail_capacity: usize,
}

impl Tracking {
    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core { event_buffer_size: 8 },
                auth: Auth {
                    url: "https://auth.url".to_string(),
                    username: "emilys".to_string(),
                    password: "emilyspass".to_string(),
                    timeout: Duration::from_secs(5),
                },
                storage: Storage { path: None },
                feed: Feed {
                    url: "https://feed.url".to_string(),
                    retry_ms: 100,
                    retry_max_delay: Duration::from_millis(200),
                    stale_connection_timeout: Duration::from_secs(30),
                    poll_interval: Duration::from_secs(300),
                },
                tracking: Tracking { trail_capacity: 100 },
                geofences: Vec::new(),
            },
        }
    }

    pub fn auth_url(mut self, url: String) -> Self {
        self.config.auth.url = url;
        self
    }

    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.config.auth.username = username.to_string();
        self.config.auth.password = password.to_string();
        self
    }

    pub fn feed_url(mut self, url: String) -> Self {
        self.config.feed.url = url;
        self
    }

    pub fn geofences(mut self, geofences: Vec<Geofence>) -> Self {
        self.config.geofences = geofences;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
