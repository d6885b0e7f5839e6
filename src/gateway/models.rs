use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BacktestParameters, BacktestResults, CycleRecord, MarketSnapshot};

/// Minimal `{success, error?, output?}` envelope every mutating endpoint
/// answers with. `output` is the process output some action endpoints
/// return instead of `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// The human-readable failure text, whichever field carried it.
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Account balances in `/api/data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub usdc: Decimal,
    #[serde(default)]
    pub btc: Decimal,
    #[serde(default)]
    pub btc_price: Decimal,
}

/// Aggregate counters the backend precomputes for the overview header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotStats {
    #[serde(default)]
    pub gain_abs: Decimal,
    #[serde(default)]
    pub gain_percent: Decimal,
    #[serde(default)]
    pub completed_cycles: u64,
    #[serde(default)]
    pub total_cycles: u64,
}

/// Live bot configuration as shown on the overview tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub buy_offset: i64,
    #[serde(default)]
    pub sell_offset: i64,
    #[serde(default)]
    pub percent: Decimal,
}

/// `GET /api/data` — the main dashboard payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardData {
    pub balances: Balances,
    pub stats: BotStats,
    #[serde(default)]
    pub config: Option<BotConfig>,
    #[serde(default)]
    pub cycles: Vec<CycleRecord>,
    #[serde(default)]
    pub last_update: Option<String>,
}

/// One point of `GET /api/performance` (already cumulative, backend-side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub cycle_id: u64,
    #[serde(default)]
    pub gain: Decimal,
    pub cumulative_gain: Decimal,
}

/// `GET /api/gains-distribution` — ranges are preformatted labels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GainsDistribution {
    #[serde(default)]
    pub ranges: Vec<String>,
    #[serde(default)]
    pub counts: Vec<u64>,
}

/// `GET /api/active-cycles-history-split` — per-day counts of cycles
/// sitting on the buy vs sell side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleHistorySplit {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub buy_counts: Vec<u64>,
    #[serde(default)]
    pub sell_counts: Vec<u64>,
    #[serde(default)]
    pub full_dates: Vec<String>,
}

impl CycleHistorySplit {
    /// Last `days` entries; `0` means the whole history.
    pub fn tail(&self, days: usize) -> CycleHistorySplit {
        if days == 0 || self.dates.len() <= days {
            return self.clone();
        }
        let start = self.dates.len() - days;
        CycleHistorySplit {
            dates: self.dates[start..].to_vec(),
            buy_counts: self.buy_counts[start.min(self.buy_counts.len())..].to_vec(),
            sell_counts: self.sell_counts[start.min(self.sell_counts.len())..].to_vec(),
            full_dates: self.full_dates[start.min(self.full_dates.len())..].to_vec(),
        }
    }
}

/// `GET /api/active-sell-orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveSellOrders {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub orders: Vec<CycleRecord>,
    #[serde(default)]
    pub btc_price: Decimal,
}

/// `GET /api/auto-status` — automation scheduler state.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoStatus {
    pub enabled: bool,
    #[serde(default)]
    pub interval_minutes: f64,
    #[serde(default)]
    pub last_cycle_time: Option<String>,
    #[serde(default)]
    pub next_cycle_time: Option<String>,
    #[serde(default)]
    pub minutes_remaining: Option<f64>,
}

/// `GET /api/market-data` wraps the snapshot in the success envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
}

/// `GET /api/market-chart?period=`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub prices: Vec<f64>,
    /// Epoch milliseconds, parallel to `prices` when present.
    #[serde(default)]
    pub timestamps: Option<Vec<i64>>,
    #[serde(default)]
    pub count: usize,
}

/// `POST /api/backtest` response.
#[derive(Debug, Clone, Deserialize)]
pub struct BacktestResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    pub results: Option<BacktestResults>,
    pub parameters: Option<BacktestParameters>,
}

/// `POST /api/export` names the files made available under `/download/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub csv_file: Option<String>,
    #[serde(default)]
    pub json_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn dashboard_data_deserializes() {
        let json = r#"{
            "balances": {"usdc": 1200.50, "btc": 0.031, "btc_price": 64000},
            "stats": {"gain_abs": 85.2, "gain_percent": 7.1,
                      "completed_cycles": 40, "total_cycles": 46},
            "config": {"buy_offset": -150, "sell_offset": 300, "percent": 10},
            "cycles": [
                {"id": 1, "status": "completed", "quantity": 0.001,
                 "buyPrice": 60000, "sellPrice": 61000}
            ],
            "last_update": "2024-03-15 14:30:00"
        }"#;
        let data: DashboardData = serde_json::from_str(json).unwrap();
        assert_eq!(data.balances.usdc, dec!(1200.50));
        assert_eq!(data.stats.completed_cycles, 40);
        assert_eq!(data.cycles.len(), 1);
        assert_eq!(data.config.unwrap().buy_offset, -150);
    }

    #[test]
    fn market_data_flattens_snapshot() {
        let json = r#"{
            "success": true,
            "price": 64000.5,
            "price_change_24h": -1.2,
            "volume_24h": 31000000000,
            "fear_greed_index": 72
        }"#;
        let resp: MarketDataResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.snapshot.price, dec!(64000.5));
        assert_eq!(resp.snapshot.fear_greed_index, Some(72));
    }

    #[test]
    fn ack_failure_message_prefers_error() {
        let ack: Ack =
            serde_json::from_str(r#"{"success": false, "error": "boom", "output": "log"}"#)
                .unwrap();
        assert_eq!(ack.failure_message(), "boom");

        let ack: Ack = serde_json::from_str(r#"{"success": false, "output": "log"}"#).unwrap();
        assert_eq!(ack.failure_message(), "log");

        let ack: Ack = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(ack.failure_message(), "unknown error");
    }

    #[test]
    fn history_split_tail() {
        let split = CycleHistorySplit {
            dates: (0..5).map(|i| format!("d{i}")).collect(),
            buy_counts: vec![1, 2, 3, 4, 5],
            sell_counts: vec![5, 4, 3, 2, 1],
            full_dates: Vec::new(),
        };
        let tail = split.tail(2);
        assert_eq!(tail.dates, vec!["d3", "d4"]);
        assert_eq!(tail.buy_counts, vec![4, 5]);
        assert_eq!(split.tail(0).dates.len(), 5);
    }
}
