use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position-sizing strategy the backend simulates. Wire names match the
/// values the backtest form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BacktestStrategy {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "percentage_5")]
    Percentage5,
    #[serde(rename = "percentage_10")]
    Percentage10,
    #[serde(rename = "percentage_20")]
    Percentage20,
    #[serde(rename = "fixed_50")]
    Fixed50,
    #[serde(rename = "fixed_100")]
    Fixed100,
    #[serde(rename = "fixed_200")]
    Fixed200,
}

impl BacktestStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BacktestStrategy::Default => "default",
            BacktestStrategy::Percentage5 => "percentage_5",
            BacktestStrategy::Percentage10 => "percentage_10",
            BacktestStrategy::Percentage20 => "percentage_20",
            BacktestStrategy::Fixed50 => "fixed_50",
            BacktestStrategy::Fixed100 => "fixed_100",
            BacktestStrategy::Fixed200 => "fixed_200",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BacktestStrategy::Default => "Default sizing",
            BacktestStrategy::Percentage5 => "5% of capital per trade",
            BacktestStrategy::Percentage10 => "10% of capital per trade",
            BacktestStrategy::Percentage20 => "20% of capital per trade",
            BacktestStrategy::Fixed50 => "Fixed $50 per trade",
            BacktestStrategy::Fixed100 => "Fixed $100 per trade",
            BacktestStrategy::Fixed200 => "Fixed $200 per trade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "default" => Some(BacktestStrategy::Default),
            "percentage_5" => Some(BacktestStrategy::Percentage5),
            "percentage_10" => Some(BacktestStrategy::Percentage10),
            "percentage_20" => Some(BacktestStrategy::Percentage20),
            "fixed_50" => Some(BacktestStrategy::Fixed50),
            "fixed_100" => Some(BacktestStrategy::Fixed100),
            "fixed_200" => Some(BacktestStrategy::Fixed200),
            _ => None,
        }
    }
}

impl fmt::Display for BacktestStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the simulated trade ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestTrade {
    pub cycle_id: u64,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub quantity: Decimal,
    /// Gain of the underlying historical cycle at its real size.
    #[serde(default)]
    pub gain: Decimal,
    /// Gain of the simulated position under the chosen sizing strategy.
    pub trade_gain: Decimal,
    /// Capital after this trade settled.
    pub capital: Decimal,
}

/// Backend backtest output. Opaque to the aggregation engine; the chart
/// layer only walks the equity curve and the ledger in the given order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResults {
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    pub total_return: Decimal,
    pub total_trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    pub win_rate: Decimal,
    pub max_drawdown: Decimal,
    pub sharpe_ratio: Decimal,
    /// One capital value per executed trade, chronological.
    pub equity_curve: Vec<Decimal>,
    #[serde(default)]
    pub trades: Vec<BacktestTrade>,
}

/// Echo of the parameters the backend actually ran with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestParameters {
    pub strategy: String,
    pub initial_capital: Decimal,
    #[serde(default)]
    pub total_cycles: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn strategy_wire_names_round_trip() {
        for s in [
            BacktestStrategy::Default,
            BacktestStrategy::Percentage5,
            BacktestStrategy::Fixed200,
        ] {
            assert_eq!(BacktestStrategy::from_str(s.as_str()), Some(s));
        }
        assert_eq!(BacktestStrategy::from_str("percentage_50"), None);
    }

    #[test]
    fn results_deserialize_without_trades() {
        let json = r#"{
            "initial_capital": 1000,
            "final_capital": 1150.50,
            "total_return": 15.05,
            "total_trades": 12,
            "winning_trades": 9,
            "losing_trades": 3,
            "win_rate": 75.0,
            "max_drawdown": 4.2,
            "sharpe_ratio": 1.8,
            "equity_curve": [1000, 1020, 1150.50]
        }"#;
        let results: BacktestResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.final_capital, dec!(1150.50));
        assert_eq!(results.equity_curve.len(), 3);
        assert!(results.trades.is_empty());
    }
}
