use std::sync::RwLock;
use std::time::Duration;

use actix_web::rt;
use actix_web::web;
use log::{debug, warn};
use predictor_api::api::{ApiError, PredictorAPI};
use price_model::TickerQuote;
use serde::Serialize;

/// Shown instead of a flat 0% so every entry keeps a direction.
const ZERO_CHANGE_DISPLAY: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerEntry {
    pub symbol: String,
    pub change: f64,
    pub direction: Direction,
    pub label: String,
}

impl From<TickerQuote> for TickerEntry {
    fn from(quote: TickerQuote) -> Self {
        let change = if quote.change == 0.0 {
            ZERO_CHANGE_DISPLAY
        } else {
            quote.change
        };
        let (direction, arrow) = if change >= 0.0 {
            (Direction::Up, '▲')
        } else {
            (Direction::Down, '▼')
        };

        TickerEntry {
            symbol: quote.symbol,
            change,
            direction,
            label: format!("{} {:.2}%", arrow, change.abs()),
        }
    }
}

/// Last ticker snapshot fetched successfully.
#[derive(Default)]
pub struct TickerBoard {
    snapshot: RwLock<Vec<TickerEntry>>,
}

impl TickerBoard {
    pub fn snapshot(&self) -> Vec<TickerEntry> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replaces the snapshot on success and keeps the previous one on failure.
    pub fn apply(&self, fetched: Result<Vec<TickerQuote>, ApiError>) -> bool {
        match fetched {
            Ok(quotes) => {
                let entries: Vec<TickerEntry> = quotes.into_iter().map(TickerEntry::from).collect();
                debug!("apply | {} tickers", entries.len());
                *self
                    .snapshot
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = entries;
                true
            }
            Err(e) => {
                warn!("apply | keeping previous tickers | {}", e);
                false
            }
        }
    }

    pub async fn refresh(&self, api: &PredictorAPI) -> bool {
        self.apply(api.get_tickers().await)
    }
}

/// Polls the backend every `period`, starting immediately.
pub fn spawn_ticker_poller(board: web::Data<TickerBoard>, api: PredictorAPI, period: Duration) {
    rt::spawn(async move {
        let mut interval = rt::time::interval(period);
        loop {
            interval.tick().await;
            board.refresh(&api).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, change: f64) -> TickerQuote {
        TickerQuote {
            symbol: symbol.to_string(),
            change,
        }
    }

    fn failure() -> ApiError {
        ApiError::Backend {
            status: 503,
            message: None,
        }
    }

    #[test]
    fn entry_pass_up() {
        let entry = TickerEntry::from(quote("AAPL", 1.234));
        assert_eq!(entry.direction, Direction::Up);
        assert_eq!(entry.label, "▲ 1.23%");
    }

    #[test]
    fn entry_pass_down() {
        let entry = TickerEntry::from(quote("TSLA", -2.5));
        assert_eq!(entry.direction, Direction::Down);
        assert_eq!(entry.label, "▼ 2.50%");
    }

    #[test]
    fn entry_pass_zero_change() {
        let entry = TickerEntry::from(quote("KO", 0.0));
        assert_eq!(entry.change, 0.01);
        assert_eq!(entry.direction, Direction::Up);
        assert_eq!(entry.label, "▲ 0.01%");
    }

    #[test]
    fn board_starts_empty() {
        assert!(TickerBoard::default().snapshot().is_empty());
    }

    #[test]
    fn board_updates_on_success() {
        let board = TickerBoard::default();
        assert!(board.apply(Ok(vec![quote("AAPL", 1.0), quote("MSFT", -1.0)])));
        let symbols: Vec<String> = board.snapshot().into_iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn board_retains_on_failure() {
        let board = TickerBoard::default();
        board.apply(Ok(vec![quote("AAPL", 1.0)]));
        assert!(!board.apply(Err(failure())));
        assert_eq!(board.snapshot().len(), 1);
        assert_eq!(board.snapshot()[0].symbol, "AAPL");
    }

    #[test]
    fn board_serializes_direction() {
        let entry = TickerEntry::from(quote("AAPL", 1.0));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["direction"], "up");
    }
}
