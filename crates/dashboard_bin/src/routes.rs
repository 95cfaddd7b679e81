use std::num::NonZeroUsize;

use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, warn};
use predictor_api::api::{ApiError, PredictorAPI};
use price_model::ErrorBody;
use serde::{Deserialize, Serialize};
use trend_forecast::{ForecastError, JitterSource, RandomJitter};

use crate::chart_svg::{CHART_SIZE, chart_title, render_svg};
use crate::ticker_board::TickerBoard;
use crate::utils;
use crate::view::{self, NO_CHART_DATA};

pub const INVALID_SYMBOL: &str = "Please enter a valid ticker symbol.";
pub const GENERIC_FAILURE: &str = "Something went wrong. Try again.";

pub struct ForecastSettings {
    pub horizon: NonZeroUsize,
}

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
}

#[derive(Deserialize)]
struct PredictForm {
    symbol: String,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct ChartQuery {
    seed: Option<u64>,
}

fn error_body(message: impl Into<String>) -> ErrorBody {
    ErrorBody {
        error: message.into(),
    }
}

fn backend_failure(symbol: &str, e: &ApiError) -> HttpResponse {
    error!("backend_failure | symbol: {} | {}", symbol, e);
    HttpResponse::BadGateway().json(error_body(e.backend_message().unwrap_or(GENERIC_FAILURE)))
}

/// A seed makes the forecast reproducible; without one each request draws fresh jitter.
fn jitter_for(seed: Option<u64>) -> Box<dyn JitterSource> {
    match seed {
        Some(seed) => Box::new(RandomJitter::seeded(seed)),
        None => Box::new(RandomJitter::from_thread()),
    }
}

#[get("/healthcheck")]
async fn healthcheck() -> impl Responder {
    web::Json(HealthcheckResponse {
        status: "ok".to_string(),
    })
}

#[get("/tickers")]
async fn get_tickers(board: web::Data<TickerBoard>) -> impl Responder {
    web::Json(board.snapshot())
}

#[post("/predict")]
async fn predict(
    form: web::Json<PredictForm>,
    api: web::Data<PredictorAPI>,
    settings: web::Data<ForecastSettings>,
) -> HttpResponse {
    let symbol = utils::sanitize_ticker(&form.symbol);
    if symbol.is_empty() {
        return HttpResponse::BadRequest().json(error_body(INVALID_SYMBOL));
    }

    let response = match api.predict(&symbol).await {
        Ok(response) => response,
        Err(e) => return backend_failure(&symbol, &e),
    };

    let mut jitter = jitter_for(form.seed);
    match view::build_view(response, settings.horizon, jitter.as_mut()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => {
            warn!("predict | symbol: {} | {}", symbol, e);
            HttpResponse::BadGateway().json(error_body(e.to_string()))
        }
    }
}

#[get("/predict/{symbol}/chart.svg")]
async fn prediction_chart(
    symbol: web::Path<String>,
    query: web::Query<ChartQuery>,
    api: web::Data<PredictorAPI>,
    settings: web::Data<ForecastSettings>,
) -> HttpResponse {
    let symbol = utils::sanitize_ticker(&symbol);
    if symbol.is_empty() {
        return HttpResponse::BadRequest().json(error_body(INVALID_SYMBOL));
    }

    let response = match api.predict(&symbol).await {
        Ok(response) => response,
        Err(e) => return backend_failure(&symbol, &e),
    };

    let mut jitter = jitter_for(query.seed);
    let chart = match view::chart_forecast(&response, settings.horizon, jitter.as_mut()) {
        Ok(Some(chart)) => chart,
        Ok(None) => return HttpResponse::NotFound().json(error_body(NO_CHART_DATA)),
        Err(e @ ForecastError::InsufficientData { .. }) => {
            return HttpResponse::UnprocessableEntity().json(error_body(e.to_string()));
        }
        Err(e) => {
            warn!("prediction_chart | symbol: {} | {}", symbol, e);
            return HttpResponse::BadGateway().json(error_body(e.to_string()));
        }
    };

    let title = chart_title(chart.window.len(), chart.forecast.len());
    match render_svg(&chart.series, &title, CHART_SIZE) {
        Ok(svg) => HttpResponse::Ok().content_type("image/svg+xml").body(svg),
        Err(e) => {
            error!("prediction_chart | symbol: {} | {}", symbol, e);
            HttpResponse::InternalServerError().json(error_body(GENERIC_FAILURE))
        }
    }
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(HealthcheckResponse {
        status: "not found".to_string(),
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(healthcheck)
        .service(get_tickers)
        .service(predict)
        .service(prediction_chart);
}
