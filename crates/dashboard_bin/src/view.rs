use std::num::NonZeroUsize;

use price_model::{ForecastPoint, PredictionResponse, PriceHistory};
use serde::Serialize;
use trend_forecast::{ChartForecast, ChartSeries, ForecastError, JitterSource, forecast_chart};

pub const NO_CHART_DATA: &str = "No chart data available.";
const MISSING_VALUE: &str = "-";

#[derive(Debug, Serialize)]
pub struct CompanyCard {
    pub name: String,
    pub summary: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct SummaryRow {
    pub title: &'static str,
    pub value: String,
}

/// Everything the dashboard shows for one prediction request.
#[derive(Debug, Serialize)]
pub struct PredictionView {
    pub symbol: String,
    pub company: CompanyCard,
    pub table: Vec<SummaryRow>,
    pub latest_price: Option<f64>,
    pub predicted_price: Option<f64>,
    pub average_daily_change: Option<f64>,
    pub forecast: Vec<ForecastPoint>,
    pub chart: Option<ChartSeries>,
    pub notice: Option<String>,
}

/// Runs the forecast over the backend's chart data.
///
/// `Ok(None)` means there is nothing to chart.
pub fn chart_forecast<J>(
    response: &PredictionResponse,
    horizon: NonZeroUsize,
    jitter: &mut J,
) -> Result<Option<ChartForecast>, ForecastError>
where
    J: JitterSource + ?Sized,
{
    let history = PriceHistory::from_raw(&response.chart_data)?;
    if history.is_empty() {
        return Ok(None);
    }
    forecast_chart(&history, horizon, jitter).map(Some)
}

pub fn build_view<J>(
    response: PredictionResponse,
    horizon: NonZeroUsize,
    jitter: &mut J,
) -> Result<PredictionView, ForecastError>
where
    J: JitterSource + ?Sized,
{
    let (chart, notice) = match chart_forecast(&response, horizon, jitter) {
        Ok(Some(chart)) => (Some(chart), None),
        Ok(None) => (None, Some(NO_CHART_DATA.to_string())),
        Err(e @ ForecastError::InsufficientData { .. }) => (None, Some(e.to_string())),
        Err(e) => return Err(e),
    };

    let table = summary_table(&response);
    let company = CompanyCard {
        name: response
            .company_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| response.symbol.clone()),
        summary: response.summary,
        sector: response.sector,
        industry: response.industry,
    };

    let (forecast, average_daily_change, series) = match chart {
        Some(chart) => (
            chart.forecast,
            Some(chart.average_daily_change),
            Some(chart.series),
        ),
        None => (Vec::new(), None, None),
    };

    Ok(PredictionView {
        symbol: response.symbol,
        company,
        table,
        latest_price: response.latest_price,
        predicted_price: response.predicted_price,
        average_daily_change,
        forecast,
        chart: series,
        notice,
    })
}

pub fn summary_table(response: &PredictionResponse) -> Vec<SummaryRow> {
    [
        ("Previous Close", response.previous_close),
        ("Open", response.open),
        ("Day High", response.day_high),
        ("Day Low", response.day_low),
        ("Market Cap", response.market_cap),
    ]
    .into_iter()
    .map(|(title, value)| SummaryRow {
        title,
        value: format_usd(value),
    })
    .collect()
}

/// `$1,234.56`, or `-` when the value is absent.
pub fn format_usd(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return MISSING_VALUE.to_string();
    };

    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}
