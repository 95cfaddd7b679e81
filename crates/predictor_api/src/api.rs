use log::{debug, warn};
use price_model::{ErrorBody, PredictionRequest, PredictionResponse, TickerQuote};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to reach the prediction backend")]
    Request(#[from] reqwest::Error),

    #[error("prediction backend answered {status}")]
    Backend { status: u16, message: Option<String> },

    #[error("failed to parse the prediction backend response")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The `error` text the backend put in its response body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Client for the external service that produces tickers and predictions.
#[derive(Clone)]
pub struct PredictorAPI {
    base_url: String,
    client: reqwest::Client,
}

impl PredictorAPI {
    pub fn new(base_url: &str) -> Self {
        PredictorAPI {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_tickers(&self) -> Result<Vec<TickerQuote>, ApiError> {
        let url = self.endpoint("tickers");

        debug!("get_tickers | url: {}", url);

        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    pub async fn predict(&self, symbol: &str) -> Result<PredictionResponse, ApiError> {
        let url = self.endpoint("predict");

        debug!("predict | url: {} | symbol: {}", url, symbol);

        let response = self
            .client
            .post(&url)
            .json(&PredictionRequest {
                symbol: symbol.to_string(),
            })
            .send()
            .await?;
        decode(response).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let error = backend_error(status.as_u16(), &body);
        warn!("decode | {} | message: {:?}", error, error.backend_message());
        return Err(error);
    }

    Ok(serde_json::from_str(&body)?)
}

fn backend_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty());
    ApiError::Backend { status, message }
}
