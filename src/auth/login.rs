use crate::app_config::AppConfig;
use crate::storage::{KeyValueStore, StorageError, keys};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    pub fn from_config(config: &'a AppConfig) -> Self {
        Credentials {
            username: config.auth().username(),
            password: config.auth().password(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Session { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    message: Option<String>,
}

#[instrument(skip_all, fields(username = credentials.username))]
pub async fn login(client: &Client, config: &AppConfig, credentials: &Credentials<'_>) -> Result<Session, AuthError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    info!("🔑 Logging in...");
    let response = client.post(format!("{}/auth/login", config.auth().url())).json(credentials).send().await?;

    let status = response.status();
    if status.is_client_error() {
        let message = response.json::<LoginResponse>().await.ok().and_then(|r| r.message);
        warn!(%status, "🔑 Logging in... failed");
        return Err(AuthError::InvalidCredentials(message.unwrap_or_else(|| status.to_string())));
    }

    let body = response.error_for_status()?.json::<LoginResponse>().await?;
    let Some(token) = body.token.or(body.access_token) else {
        warn!("🔑 Logging in... failed, no token in response");
        return Err(AuthError::InvalidCredentials(body.message.unwrap_or_else(|| "no token in response".to_string())));
    };

    info!("🔑 Logging in... OK");
    Ok(Session::new(token))
}

/// Reuses the token kept in `store`, logging in and storing a fresh token when there is none.
#[instrument(skip_all)]
pub async fn restore_or_login(client: &Client, config: &AppConfig, store: &dyn KeyValueStore) -> Result<Session, AuthError> {
    if let Some(token) = store.get(keys::TOKEN).await?.filter(|t| !t.is_empty()) {
        info!("🔑 Restored stored session");
        return Ok(Session::new(token));
    }

    let session = login(client, config, &Credentials::from_config(config)).await?;
    store.set(keys::TOKEN, session.token.clone()).await?;
    Ok(session)
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("please enter both username and password")]
    MissingCredentials,
    #[error("invalid username or password: {0}")]
    InvalidCredentials(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
