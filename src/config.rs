use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

use crate::{
    application::SchedulerConfig, infrastructure::messaging::WebhookConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub scheme: String,
    pub host: String,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub webhook: Option<WebhookConfig>,
    pub scheduler: SchedulerConfig,
    pub scheduler_autostart: bool,
}

impl Config {
    /// Reads the process environment, after loading `.env` if present.
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let webhook = get("WEBHOOK_URL").map(|url| WebhookConfig {
            url,
            auth_key: get("WEBHOOK_AUTH_KEY"),
        });

        let defaults = SchedulerConfig::default();
        let interval_secs = parse_or(&get, "SCHEDULER_INTERVAL_SECS", defaults.interval.as_secs())?;
        if interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SCHEDULER_INTERVAL_SECS",
                value: interval_secs.to_string(),
            });
        }

        Ok(Config {
            port: parse_or(&get, "PORT", 8080)?,
            scheme: get("SCHEME").unwrap_or_else(|| "http".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url: get("DATABASE_URL"),
            redis_url: get("REDIS_URL"),
            webhook,
            scheduler: SchedulerConfig {
                interval: Duration::from_secs(interval_secs),
                batch_size: parse_or(&get, "SCHEDULER_BATCH_SIZE", defaults.batch_size)?,
            },
            scheduler_autostart: parse_or(&get, "SCHEDULER_AUTOSTART", true)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_run_in_memory_dry_run_mode() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert!(config.redis_url.is_none());
        assert!(config.webhook.is_none());
        assert_eq!(config.scheduler.interval, Duration::from_secs(120));
        assert_eq!(config.scheduler.batch_size, 2);
        assert!(config.scheduler_autostart);
    }

    #[test]
    fn webhook_auth_key_is_optional() {
        let config = parse(&[("WEBHOOK_URL", "https://webhook.site/abc")]).unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.url, "https://webhook.site/abc");
        assert!(webhook.auth_key.is_none());

        let config = parse(&[
            ("WEBHOOK_URL", "https://webhook.site/abc"),
            ("WEBHOOK_AUTH_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.webhook.unwrap().auth_key.as_deref(), Some("secret"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = parse(&[("WEBHOOK_URL", "  "), ("DATABASE_URL", "")]).unwrap();
        assert!(config.webhook.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = parse(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"eighty\" for PORT");

        assert!(parse(&[("SCHEDULER_INTERVAL_SECS", "0")]).is_err());
        assert!(parse(&[("SCHEDULER_AUTOSTART", "maybe")]).is_err());
    }
}
