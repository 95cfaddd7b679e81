use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod wire;

pub use wire::{ErrorBody, PredictionRequest, PredictionResponse, TickerQuote};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Forecast points share the observed shape; only the origin of `price` differs.
pub type ForecastPoint = PricePoint;

/// A `{date, price}` record exactly as the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPricePoint {
    #[serde(default)]
    pub date: serde_json::Value,
    #[serde(default)]
    pub price: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedPointError {
    #[error("point {index}: invalid date {value}")]
    InvalidDate { index: usize, value: String },

    #[error("point {index}: invalid price {value}")]
    InvalidPrice { index: usize, value: String },
}

impl RawPricePoint {
    pub fn new(date: impl Into<serde_json::Value>, price: impl Into<serde_json::Value>) -> Self {
        RawPricePoint {
            date: date.into(),
            price: price.into(),
        }
    }

    /// Strings are never coerced into prices; only JSON numbers are accepted.
    pub fn parse(&self, index: usize) -> Result<PricePoint, MalformedPointError> {
        let date = self
            .date
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .ok_or_else(|| MalformedPointError::InvalidDate {
                index,
                value: self.date.to_string(),
            })?;

        let price = self
            .price
            .as_f64()
            .filter(|p| p.is_finite())
            .ok_or_else(|| MalformedPointError::InvalidPrice {
                index,
                value: self.price.to_string(),
            })?;

        Ok(PricePoint { date, price })
    }
}

/// Price history sorted ascending by date.
///
/// Sorting is stable and duplicate dates are kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        PriceHistory { points }
    }

    /// Parses every record, failing on the first malformed one.
    pub fn from_raw(raw: &[RawPricePoint]) -> Result<Self, MalformedPointError> {
        let points = raw
            .iter()
            .enumerate()
            .map(|(index, point)| point.parse(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PriceHistory::new(points))
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The most recent `n` points, or all of them when fewer exist.
    pub fn trailing(&self, n: usize) -> PriceHistory {
        let start = self.points.len().saturating_sub(n);
        PriceHistory {
            points: self.points[start..].to_vec(),
        }
    }
}

impl FromIterator<PricePoint> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        PriceHistory::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn parse_pass_numeric_price() {
        let point = RawPricePoint::new("2024-01-02", 110.5).parse(0).unwrap();
        assert_eq!(point.date, date("2024-01-02"));
        assert_eq!(point.price, 110.5);
    }

    #[test]
    fn parse_pass_integer_price() {
        let point = RawPricePoint::new("2024-01-02", 110).parse(0).unwrap();
        assert_eq!(point.price, 110.0);
    }

    #[test]
    fn parse_fail_string_price() {
        let result = RawPricePoint::new("2024-01-02", "abc").parse(3);
        assert_eq!(
            result,
            Err(MalformedPointError::InvalidPrice {
                index: 3,
                value: "\"abc\"".to_string()
            })
        );
    }

    #[test]
    fn parse_fail_numeric_string_price() {
        let result = RawPricePoint::new("2024-01-02", "101.5").parse(0);
        assert!(matches!(
            result,
            Err(MalformedPointError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn parse_fail_datetime() {
        let result = RawPricePoint::new("2024-01-02T10:00:00Z", 1.0).parse(1);
        assert!(matches!(
            result,
            Err(MalformedPointError::InvalidDate { index: 1, .. })
        ));
    }

    #[test]
    fn parse_fail_missing_fields() {
        let raw: RawPricePoint = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            raw.parse(0),
            Err(MalformedPointError::InvalidDate { .. })
        ));
    }

    #[test]
    fn history_sorts_by_date() {
        let history = PriceHistory::from_raw(&[
            RawPricePoint::new("2024-01-03", 3.0),
            RawPricePoint::new("2024-01-01", 1.0),
            RawPricePoint::new("2024-01-02", 2.0),
        ])
        .unwrap();
        let prices: Vec<f64> = history.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn history_keeps_duplicate_dates_in_order() {
        let history = PriceHistory::new(vec![
            PricePoint { date: date("2024-01-02"), price: 2.0 },
            PricePoint { date: date("2024-01-01"), price: 1.0 },
            PricePoint { date: date("2024-01-02"), price: 2.5 },
        ]);
        let prices: Vec<f64> = history.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 2.5]);
    }

    #[test]
    fn history_fails_on_first_malformed_point() {
        let result = PriceHistory::from_raw(&[
            RawPricePoint::new("2024-01-01", 1.0),
            RawPricePoint::new("not a date", 2.0),
            RawPricePoint::new("2024-01-03", "x"),
        ]);
        assert!(matches!(
            result,
            Err(MalformedPointError::InvalidDate { index: 1, .. })
        ));
    }

    #[test]
    fn trailing_takes_most_recent() {
        let history: PriceHistory = (1..=10)
            .map(|day| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                price: day as f64,
            })
            .collect();
        let window = history.trailing(7);
        assert_eq!(window.len(), 7);
        assert_eq!(window.points()[0].price, 4.0);
        assert_eq!(window.last().unwrap().price, 10.0);
        assert_eq!(history.trailing(20).len(), 10);
    }

    #[test]
    fn history_serializes_as_array() {
        let history = PriceHistory::new(vec![PricePoint {
            date: date("2024-01-01"),
            price: 100.0,
        }]);
        assert_eq!(
            serde_json::to_value(&history).unwrap(),
            json!([{"date": "2024-01-01", "price": 100.0}])
        );
    }
}
