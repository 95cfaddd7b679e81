use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_TICKER_INTERVAL_SECS: u64 = 10;
const DEFAULT_HORIZON_DAYS: usize = 7;
const MAX_HORIZON_DAYS: usize = 365;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub workers: usize,
    pub bind: String,
    pub backend_url: String,
    pub ticker_interval: Duration,
    pub horizon: NonZeroUsize,
}

impl Config {
    pub fn new() -> Result<Config, ConfigError> {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend_url = lookup("DASHBOARD_BACKEND_URL")
            .ok_or(ConfigError::Missing("DASHBOARD_BACKEND_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let mut workers: usize = parse_or(lookup("DASHBOARD_WORKERS"), "DASHBOARD_WORKERS", 1)?;
        if workers == 0 {
            workers = 1;
        }

        let bind = lookup("DASHBOARD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());

        let mut interval_secs: u64 = parse_or(
            lookup("DASHBOARD_TICKER_INTERVAL_SECS"),
            "DASHBOARD_TICKER_INTERVAL_SECS",
            DEFAULT_TICKER_INTERVAL_SECS,
        )?;
        if interval_secs == 0 {
            interval_secs = DEFAULT_TICKER_INTERVAL_SECS;
        }

        let horizon_days: usize = parse_or(
            lookup("DASHBOARD_HORIZON_DAYS"),
            "DASHBOARD_HORIZON_DAYS",
            DEFAULT_HORIZON_DAYS,
        )?;
        let horizon = NonZeroUsize::new(horizon_days)
            .filter(|days| days.get() <= MAX_HORIZON_DAYS)
            .ok_or(ConfigError::Invalid {
                key: "DASHBOARD_HORIZON_DAYS",
                value: horizon_days.to_string(),
            })?;

        Ok(Config {
            workers,
            bind,
            backend_url,
            ticker_interval: Duration::from_secs(interval_secs),
            horizon,
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
