use crate::app_config::AppConfig;
use crate::auth::Session;
use reqwest::header::HeaderValue;
use reqwest::{Client, header};
use thiserror::Error;

/// Builds the client used for the position feed, authenticated with the session token.
pub fn new_client(config: &AppConfig, session: &Session) -> Result<Client, FeedClientError> {
    let mut headers = header::HeaderMap::new();
    let mut authorization_value = HeaderValue::from_str(&format!("Bearer {}", session.token()))?;
    authorization_value.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, authorization_value);

    let client = Client::builder()
        .user_agent(crate::auth::USER_AGENT)
        .connect_timeout(config.auth().timeout())
        .default_headers(headers)
        .build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum FeedClientError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("session token is not a valid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}
