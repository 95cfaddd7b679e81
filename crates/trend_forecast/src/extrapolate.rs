use std::num::NonZeroUsize;

use chrono::Days;
use itertools::Itertools;
use log::debug;
use price_model::{ForecastPoint, PriceHistory};

use crate::ForecastError;
use crate::jitter::JitterSource;

/// Number of trailing observations the trend is estimated from.
pub const TRAILING_WINDOW: usize = 7;

/// Mean day-over-day fractional return across the trailing window.
///
/// Prices are not checked for positivity; a zero price yields a non-finite
/// return.
pub fn average_daily_change(history: &PriceHistory) -> Result<f64, ForecastError> {
    let window = history.trailing(TRAILING_WINDOW);
    if window.len() < 2 {
        return Err(ForecastError::InsufficientData {
            available: window.len(),
        });
    }

    let total: f64 = window
        .points()
        .iter()
        .tuple_windows()
        .map(|(prev, next)| (next.price - prev.price) / prev.price)
        .sum();

    Ok(total / (window.len() - 1) as f64)
}

/// Continues `history` for `horizon` days as a drifting random walk.
///
/// Every step compounds off the previous rounded step, so rounding error
/// accumulates over the horizon.
pub fn extrapolate<J>(
    history: &PriceHistory,
    horizon: NonZeroUsize,
    jitter: &mut J,
) -> Result<Vec<ForecastPoint>, ForecastError>
where
    J: JitterSource + ?Sized,
{
    let avg_daily_change = average_daily_change(history)?;
    extrapolate_with_drift(history, avg_daily_change, horizon, jitter)
}

/// Same walk as [`extrapolate`], with the drift already computed by the caller.
pub fn extrapolate_with_drift<J>(
    history: &PriceHistory,
    avg_daily_change: f64,
    horizon: NonZeroUsize,
    jitter: &mut J,
) -> Result<Vec<ForecastPoint>, ForecastError>
where
    J: JitterSource + ?Sized,
{
    let last = history.last().ok_or(ForecastError::EmptyHistory)?;

    debug!(
        "extrapolate | last: {} {} | avg_daily_change: {} | horizon: {}",
        last.date, last.price, avg_daily_change, horizon
    );

    let mut next_price = last.price;
    let mut forecast = Vec::with_capacity(horizon.get());
    for step in 1..=horizon.get() {
        next_price = round2(next_price * (1.0 + avg_daily_change + jitter.next_jitter()));
        let date = last
            .date
            .checked_add_days(Days::new(step as u64))
            .ok_or(ForecastError::DateOutOfRange)?;
        forecast.push(ForecastPoint {
            date,
            price: next_price,
        });
    }

    Ok(forecast)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
