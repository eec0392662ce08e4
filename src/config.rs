use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://quiz_bot.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set")]
    Missing(&'static str),
    #[error("{name} can't be parsed: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("WEBHOOK_URL and WEBHOOK_ADDR must be set together")]
    PartialWebhook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: Url,
    pub address: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub database_url: String,
    /// Updates arrive through a webhook when set, long polling otherwise.
    pub webhook: Option<WebhookConfig>,
}

impl Config {
    /// Reads the configuration from the process environment, after loading
    /// `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = read("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;
        let database_url = read("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let webhook = match (read("WEBHOOK_URL"), read("WEBHOOK_ADDR")) {
            (Some(url), Some(address)) => Some(WebhookConfig {
                url: url.parse().map_err(|e: url::ParseError| ConfigError::Invalid {
                    name: "WEBHOOK_URL",
                    reason: e.to_string(),
                })?,
                address: address
                    .parse()
                    .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                        name: "WEBHOOK_ADDR",
                        reason: e.to_string(),
                    })?,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialWebhook),
        };

        Ok(Self {
            token,
            database_url,
            webhook,
        })
    }
}
