use std::env;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HEALTHCHECK_URL: &str = "http://localhost:8080/healthcheck";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
enum HealthcheckError {
    #[error("dashboard unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("dashboard answered {0}")]
    Status(u16),

    #[error("dashboard reported status {0:?}")]
    NotOk(String),
}

#[derive(Debug, Deserialize)]
struct StatusJSON {
    status: String,
}

fn healthcheck_url(configured: Option<String>) -> String {
    configured
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HEALTHCHECK_URL.to_string())
}

fn check_status(status: StatusJSON) -> Result<(), HealthcheckError> {
    if status.status != "ok" {
        return Err(HealthcheckError::NotOk(status.status));
    }
    Ok(())
}

fn main() -> Result<(), HealthcheckError> {
    let url = healthcheck_url(env::var("HEALTHCHECK_URL").ok());
    let client = reqwest::blocking::Client::builder().timeout(TIMEOUT).build()?;

    let res = client.get(&url).send()?;
    if !res.status().is_success() {
        return Err(HealthcheckError::Status(res.status().as_u16()));
    }
    check_status(res.json::<StatusJSON>()?)
}
