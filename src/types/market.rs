use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested span of market history. Drives both the backend query string
/// and the label granularity of the projected price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketPeriod {
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "30d")]
    D30,
    #[serde(rename = "90d")]
    D90,
    #[serde(rename = "180d")]
    D180,
    #[serde(rename = "365d")]
    D365,
    #[serde(rename = "max")]
    Max,
}

impl MarketPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPeriod::H24 => "24h",
            MarketPeriod::D7 => "7d",
            MarketPeriod::D30 => "30d",
            MarketPeriod::D90 => "90d",
            MarketPeriod::D180 => "180d",
            MarketPeriod::D365 => "365d",
            MarketPeriod::Max => "max",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "24h" => Some(MarketPeriod::H24),
            "7d" => Some(MarketPeriod::D7),
            "30d" => Some(MarketPeriod::D30),
            "90d" => Some(MarketPeriod::D90),
            "180d" => Some(MarketPeriod::D180),
            "365d" => Some(MarketPeriod::D365),
            "max" => Some(MarketPeriod::Max),
            _ => None,
        }
    }

    /// Sampling step assumed when the backend returns prices without
    /// timestamps (sparklines are hourly, longer series daily).
    pub fn synthetic_step_secs(&self) -> i64 {
        match self {
            MarketPeriod::H24 | MarketPeriod::D7 => 3600,
            _ => 86_400,
        }
    }
}

impl Default for MarketPeriod {
    fn default() -> Self {
        MarketPeriod::H24
    }
}

impl fmt::Display for MarketPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sentiment bands of the externally supplied Fear & Greed scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBand {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl SentimentBand {
    pub fn from_index(value: u8) -> Self {
        match value {
            0..=20 => SentimentBand::ExtremeFear,
            21..=40 => SentimentBand::Fear,
            41..=60 => SentimentBand::Neutral,
            61..=80 => SentimentBand::Greed,
            _ => SentimentBand::ExtremeGreed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentBand::ExtremeFear => "Extreme Fear",
            SentimentBand::Fear => "Fear",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::Greed => "Greed",
            SentimentBand::ExtremeGreed => "Extreme Greed",
        }
    }
}

/// Point-in-time market snapshot served by `/api/market-data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price: Decimal,
    #[serde(default)]
    pub price_change_24h: Decimal,
    #[serde(default)]
    pub high_24h: Decimal,
    #[serde(default)]
    pub low_24h: Decimal,
    #[serde(default)]
    pub volume_24h: Decimal,
    #[serde(default)]
    pub market_cap: Decimal,
    #[serde(default)]
    pub ath: Decimal,
    #[serde(default)]
    pub circulating_supply: Decimal,
    #[serde(default)]
    pub btc_dominance: Decimal,
    #[serde(default)]
    pub eth_dominance: Decimal,
    #[serde(default)]
    pub fear_greed_index: Option<u8>,
    #[serde(default)]
    pub sparkline_24h: Vec<f64>,
    #[serde(default)]
    pub sparkline_7d: Vec<f64>,
}

impl MarketSnapshot {
    /// Percent distance of the current price from the all-time high.
    /// Negative below the ATH; zero when the ATH is unknown.
    pub fn ath_distance_pct(&self) -> Decimal {
        if self.ath.is_zero() {
            return Decimal::ZERO;
        }
        (self.price - self.ath) / self.ath * Decimal::from(100)
    }

    pub fn sentiment(&self) -> Option<SentimentBand> {
        self.fear_greed_index.map(SentimentBand::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn period_wire_names() {
        assert_eq!(MarketPeriod::H24.as_str(), "24h");
        assert_eq!(MarketPeriod::from_str("90d"), Some(MarketPeriod::D90));
        assert_eq!(MarketPeriod::from_str("2y"), None);
    }

    #[test]
    fn sentiment_band_edges() {
        assert_eq!(SentimentBand::from_index(0), SentimentBand::ExtremeFear);
        assert_eq!(SentimentBand::from_index(20), SentimentBand::ExtremeFear);
        assert_eq!(SentimentBand::from_index(21), SentimentBand::Fear);
        assert_eq!(SentimentBand::from_index(60), SentimentBand::Neutral);
        assert_eq!(SentimentBand::from_index(100), SentimentBand::ExtremeGreed);
    }

    #[test]
    fn ath_distance_guards_unknown_ath() {
        let mut snap: MarketSnapshot = serde_json::from_str(r#"{"price": 50000}"#).unwrap();
        assert_eq!(snap.ath_distance_pct(), Decimal::ZERO);
        snap.ath = dec!(100000);
        assert_eq!(snap.ath_distance_pct(), dec!(-50));
    }
}
