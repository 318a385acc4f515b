use crate::app_config::AppConfig;
use reqwest::Client;

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub fn new_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).timeout(config.auth().timeout()).build()
}
