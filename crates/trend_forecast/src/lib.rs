use std::num::NonZeroUsize;

use price_model::{ForecastPoint, MalformedPointError, PriceHistory, RawPricePoint};
use serde::Serialize;
use thiserror::Error;

pub mod extrapolate;
pub mod jitter;
pub mod project;

pub use extrapolate::{
    TRAILING_WINDOW, average_daily_change, extrapolate, extrapolate_with_drift, round2,
};
pub use jitter::{FixedJitter, JitterSource, NoJitter, RandomJitter};
pub use project::{ChartSeries, project};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("not enough price history to estimate a trend ({available} points)")]
    InsufficientData { available: usize },

    #[error("no price history to chart")]
    EmptyHistory,

    #[error("malformed price point: {0}")]
    MalformedPoint(#[from] MalformedPointError),

    #[error(
        "chart series out of alignment (labels {labels}, historical {historical}, projected {projected})"
    )]
    MisalignedSeries {
        labels: usize,
        historical: usize,
        projected: usize,
    },

    #[error("forecast date out of range")]
    DateOutOfRange,
}

/// Trailing window, its continuation and the aligned chart of both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartForecast {
    pub window: PriceHistory,
    pub forecast: Vec<ForecastPoint>,
    pub average_daily_change: f64,
    pub series: ChartSeries,
}

/// Extrapolates the trailing window of `history` and charts the window
/// followed by the forecast.
pub fn forecast_chart<J>(
    history: &PriceHistory,
    horizon: NonZeroUsize,
    jitter: &mut J,
) -> Result<ChartForecast, ForecastError>
where
    J: JitterSource + ?Sized,
{
    let window = history.trailing(TRAILING_WINDOW);
    let average_daily_change = average_daily_change(&window)?;
    let forecast = extrapolate_with_drift(&window, average_daily_change, horizon, jitter)?;
    let series = project(&window, &forecast)?;

    Ok(ChartForecast {
        window,
        forecast,
        average_daily_change,
        series,
    })
}

/// Parses raw backend records before any arithmetic and runs
/// [`forecast_chart`] on them.
pub fn forecast_chart_from_raw<J>(
    raw: &[RawPricePoint],
    horizon: NonZeroUsize,
    jitter: &mut J,
) -> Result<ChartForecast, ForecastError>
where
    J: JitterSource + ?Sized,
{
    let history = PriceHistory::from_raw(raw)?;
    forecast_chart(&history, horizon, jitter)
}
