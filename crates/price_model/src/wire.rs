use serde::{Deserialize, Deserializer, Serialize};

use crate::RawPricePoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    pub symbol: String,
    /// Percent change against the previous close.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub symbol: String,
    #[serde(default, deserialize_with = "chart_data_or_empty")]
    pub chart_data: Vec<RawPricePoint>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub day_high: Option<f64>,
    #[serde(default)]
    pub day_low: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub latest_price: Option<f64>,
    #[serde(default)]
    pub predicted_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// A non-array `chart_data` means "no chart"; array entries that are not
// objects survive as empty records and fail later as malformed points.
fn chart_data_or_empty<'de, D>(deserializer: D) -> Result<Vec<RawPricePoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(entries) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry).unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prediction_response_full() {
        let body = json!({
            "symbol": "AAPL",
            "latest_price": 190.12,
            "predicted_price": 191.0,
            "chart_data": [
                {"date": "2024-01-01", "price": 185.5},
                {"date": "2024-01-02", "price": 186.25}
            ],
            "company_name": "Apple Inc.",
            "summary": "Makes phones.",
            "sector": "Technology",
            "industry": "Consumer Electronics",
            "previous_close": 189.0,
            "open": 189.5,
            "day_high": 191.2,
            "day_low": 188.7,
            "market_cap": 2950000000000u64
        });
        let response: PredictionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.symbol, "AAPL");
        assert_eq!(response.chart_data.len(), 2);
        assert_eq!(response.chart_data[1], RawPricePoint::new("2024-01-02", 186.25));
        assert_eq!(response.market_cap, Some(2.95e12));
        assert_eq!(response.sector.as_deref(), Some("Technology"));
    }

    #[test]
    fn prediction_response_nullable_fields() {
        let body = json!({
            "symbol": "XYZ",
            "chart_data": [],
            "previous_close": null,
            "open": null
        });
        let response: PredictionResponse = serde_json::from_value(body).unwrap();
        assert!(response.chart_data.is_empty());
        assert_eq!(response.previous_close, None);
        assert_eq!(response.day_high, None);
        assert_eq!(response.company_name, None);
    }

    #[test]
    fn prediction_response_non_array_chart_data() {
        let body = json!({"symbol": "XYZ", "chart_data": "oops"});
        let response: PredictionResponse = serde_json::from_value(body).unwrap();
        assert!(response.chart_data.is_empty());
    }

    #[test]
    fn prediction_response_non_object_entry() {
        let body = json!({"symbol": "XYZ", "chart_data": [42]});
        let response: PredictionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.chart_data, vec![RawPricePoint::default()]);
        assert!(response.chart_data[0].parse(0).is_err());
    }

    #[test]
    fn ticker_quotes_list() {
        let body = r#"[{"symbol":"AAPL","change":1.25},{"symbol":"MSFT","change":-0.4}]"#;
        let quotes: Vec<TickerQuote> = serde_json::from_str(body).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].change, -0.4);
    }
}
