use chrono::NaiveDate;
use price_model::{ForecastPoint, PriceHistory};
use serde::Serialize;

use crate::ForecastError;

/// Historical and projected prices laid out on one shared date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<NaiveDate>,
    pub historical: Vec<Option<f64>>,
    pub projected: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Aligns `history` and `forecast` so the projected line starts on the last
/// observed price.
///
/// The projected series is padded with `len(history) - 1` gaps and then
/// repeats the last historical price as its anchor, which keeps all three
/// vectors at `len(history) + len(forecast)`.
pub fn project(
    history: &PriceHistory,
    forecast: &[ForecastPoint],
) -> Result<ChartSeries, ForecastError> {
    let anchor = history.last().ok_or(ForecastError::EmptyHistory)?;
    let points = history.points();
    let expected = points.len() + forecast.len();

    let labels: Vec<NaiveDate> = points
        .iter()
        .chain(forecast)
        .map(|point| point.date)
        .collect();

    let historical: Vec<Option<f64>> = points
        .iter()
        .map(|point| Some(point.price))
        .chain(std::iter::repeat_n(None, forecast.len()))
        .collect();

    let projected: Vec<Option<f64>> = std::iter::repeat_n(None, points.len() - 1)
        .chain(std::iter::once(Some(anchor.price)))
        .chain(forecast.iter().map(|point| Some(point.price)))
        .collect();

    if labels.len() != expected || historical.len() != expected || projected.len() != expected {
        return Err(ForecastError::MisalignedSeries {
            labels: labels.len(),
            historical: historical.len(),
            projected: projected.len(),
        });
    }

    Ok(ChartSeries {
        labels,
        historical,
        projected,
    })
}
