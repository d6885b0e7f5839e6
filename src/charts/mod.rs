pub mod format;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{GainBucket, SeriesPoint};
use crate::types::{BacktestResults, CycleRecord, MarketPeriod};

/// Visual capacity of the buy/sell pressure gauges.
pub const PRESSURE_GAUGE_CAPACITY: f64 = 10.0;
/// Fear & Greed is an index in [0, 100].
pub const FEAR_GREED_CAPACITY: f64 = 100.0;

/// What the renderer should draw the series as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    /// Half-ring doughnut with a fixed capacity.
    Gauge,
}

/// Presentation hints the renderer may honor. Everything here is advisory;
/// the data itself lives in `labels`/`values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleHints {
    /// Clamp the y axis to [0, 100] (success-rate charts).
    pub percent_axis: bool,
    /// Start the y axis at zero rather than the data minimum.
    pub begin_at_zero: bool,
    /// Upward series; renderer may color positive (green) vs negative (red).
    pub trend_positive: Option<bool>,
    /// Prefix tick labels with `$`.
    pub currency_axis: bool,
}

/// Renderer-ready projection: one label per value, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: StyleHints,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn dec(v: Decimal) -> f64 {
    v.to_f64().unwrap_or(0.0)
}

/// Cumulative realized gain, one point per completed cycle, labeled `#id`.
pub fn cumulative_gain(points: &[SeriesPoint]) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Line,
        labels: points.iter().map(|p| format!("#{}", p.cycle_id)).collect(),
        values: points.iter().map(|p| dec(p.value)).collect(),
        style: StyleHints {
            begin_at_zero: true,
            currency_axis: true,
            ..Default::default()
        },
    }
}

/// Rolling mean gain evolution (same shape as the cumulative line but
/// without the zero-anchored axis).
pub fn rolling_gain(points: &[SeriesPoint]) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Line,
        labels: points.iter().map(|p| format!("#{}", p.cycle_id)).collect(),
        values: points.iter().map(|p| dec(p.value)).collect(),
        style: StyleHints {
            currency_axis: true,
            ..Default::default()
        },
    }
}

/// Rolling success-rate evolution, clamped to a percent axis.
pub fn rolling_success(points: &[SeriesPoint]) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Line,
        labels: points.iter().map(|p| format!("#{}", p.cycle_id)).collect(),
        values: points.iter().map(|p| dec(p.value)).collect(),
        style: StyleHints {
            percent_axis: true,
            ..Default::default()
        },
    }
}

/// Gains distribution bar chart from analytics buckets.
pub fn gains_distribution(buckets: &[GainBucket]) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Bar,
        labels: buckets
            .iter()
            .map(|b| format::bucket_label(b.lower, b.upper))
            .collect(),
        values: buckets.iter().map(|b| b.count as f64).collect(),
        style: StyleHints {
            begin_at_zero: true,
            ..Default::default()
        },
    }
}

/// Distribution bar chart from a backend-labeled payload
/// (`/api/gains-distribution` sends its own range strings).
pub fn labeled_distribution(ranges: &[String], counts: &[u64]) -> ChartSeries {
    let len = ranges.len().min(counts.len());
    ChartSeries {
        kind: ChartKind::Bar,
        labels: ranges[..len].to_vec(),
        values: counts[..len].iter().map(|c| *c as f64).collect(),
        style: StyleHints {
            begin_at_zero: true,
            ..Default::default()
        },
    }
}

/// Winners vs losers ring.
pub fn win_loss_ratio(profitable: u64, losing: u64) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Doughnut,
        labels: vec!["Winning cycles".to_string(), "Losing cycles".to_string()],
        values: vec![profitable as f64, losing as f64],
        style: StyleHints::default(),
    }
}

/// Two-segment capacity ring: `[current, remaining]`. The current value is
/// drawn as-is but the remainder is clamped at zero, so an over-capacity
/// reading fills the ring completely instead of producing a negative
/// segment.
pub fn gauge(label: &str, current: f64, capacity: f64) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Gauge,
        labels: vec![label.to_string(), "remaining".to_string()],
        values: vec![current, (capacity - current).max(0.0)],
        style: StyleHints::default(),
    }
}

/// Backtest equity curve: one `Trade i` label per capital point, in the
/// order the backend produced them.
pub fn equity_curve(results: &BacktestResults) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Line,
        labels: (0..results.equity_curve.len())
            .map(|i| format!("Trade {}", i))
            .collect(),
        values: results.equity_curve.iter().map(|v| dec(*v)).collect(),
        style: StyleHints {
            currency_axis: true,
            trend_positive: Some(results.total_return >= Decimal::ZERO),
            ..Default::default()
        },
    }
}

/// Market price line for a period. Real timestamps (epoch milliseconds) win
/// when the backend provides them and their count matches; otherwise labels
/// are synthesized backwards from now at the period's sampling step.
pub fn market_prices(
    prices: &[f64],
    period: MarketPeriod,
    timestamps: Option<&[i64]>,
    now: DateTime<Utc>,
) -> ChartSeries {
    let labels = match timestamps {
        Some(ts) if ts.len() == prices.len() => ts
            .iter()
            .map(|ms| {
                let t = Utc
                    .timestamp_millis_opt(*ms)
                    .single()
                    .unwrap_or(now);
                format::period_label(period, t)
            })
            .collect(),
        _ => format::synthetic_period_labels(period, prices.len(), now),
    };

    let trend = match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => Some(last >= first),
        _ => None,
    };

    ChartSeries {
        kind: ChartKind::Line,
        labels,
        values: prices.to_vec(),
        style: StyleHints {
            currency_axis: true,
            trend_positive: trend,
            ..Default::default()
        },
    }
}

/// Active-cycle count sparkline (buy or sell side of the split history).
pub fn cycle_count_sparkline(dates: &[String], counts: &[u64]) -> ChartSeries {
    let len = dates.len().min(counts.len());
    ChartSeries {
        kind: ChartKind::Line,
        labels: dates[..len].to_vec(),
        values: counts[..len].iter().map(|c| *c as f64).collect(),
        style: StyleHints {
            begin_at_zero: true,
            ..Default::default()
        },
    }
}

/// Ranking table row, preformatted for display surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRankRow {
    pub rank: usize,
    pub cycle_id: u64,
    pub gain: String,
    pub gain_percent: String,
    pub quantity: Decimal,
}

/// Formats a ranked cycle list (top or bottom trades) into display rows.
pub fn trade_ranking(cycles: &[CycleRecord]) -> Vec<TradeRankRow> {
    cycles
        .iter()
        .enumerate()
        .map(|(i, c)| TradeRankRow {
            rank: i + 1,
            cycle_id: c.id,
            gain: format::currency(c.gain()),
            gain_percent: format::signed_percent(c.gain_percent(), 2),
            quantity: c.quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec as d;

    #[test]
    fn gauge_clamps_overcapacity() {
        let series = gauge("buys", 15.0, 10.0);
        assert_eq!(series.values, vec![15.0, 0.0]);
    }

    #[test]
    fn gauge_normal_split() {
        let series = gauge("fear", 35.0, 100.0);
        assert_eq!(series.values, vec![35.0, 65.0]);
    }

    #[test]
    fn equity_curve_one_label_per_point_in_order() {
        let results: BacktestResults = serde_json::from_str(
            r#"{
                "initial_capital": 1000, "final_capital": 1100,
                "total_return": 10, "total_trades": 2,
                "winning_trades": 2, "losing_trades": 0,
                "win_rate": 100, "max_drawdown": 0, "sharpe_ratio": 2.0,
                "equity_curve": [1000, 1050, 1100]
            }"#,
        )
        .unwrap();
        let series = equity_curve(&results);
        assert_eq!(series.labels, vec!["Trade 0", "Trade 1", "Trade 2"]);
        assert_eq!(series.values, vec![1000.0, 1050.0, 1100.0]);
        assert_eq!(series.style.trend_positive, Some(true));
    }

    #[test]
    fn cumulative_gain_labels_cycle_ids() {
        let points = vec![
            SeriesPoint { cycle_id: 1, value: d!(10) },
            SeriesPoint { cycle_id: 3, value: d!(25) },
        ];
        let series = cumulative_gain(&points);
        assert_eq!(series.labels, vec!["#1", "#3"]);
        assert_eq!(series.values, vec![10.0, 25.0]);
        assert!(series.style.currency_axis);
    }

    #[test]
    fn market_prices_prefers_real_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let ts = vec![
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap().timestamp_millis(),
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap().timestamp_millis(),
        ];
        let series = market_prices(&[100.0, 101.0], MarketPeriod::H24, Some(&ts), now);
        assert_eq!(series.labels, vec!["09h", "10h"]);
    }

    #[test]
    fn market_prices_falls_back_when_timestamps_mismatch() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let series = market_prices(&[100.0, 101.0, 99.0], MarketPeriod::H24, Some(&[1]), now);
        assert_eq!(series.labels, vec!["10h", "11h", "12h"]);
        assert_eq!(series.style.trend_positive, Some(false));
    }

    #[test]
    fn labeled_distribution_truncates_to_shortest() {
        let ranges = vec!["$0 to $1".to_string(), "$1 to $2".to_string()];
        let series = labeled_distribution(&ranges, &[3, 4, 9]);
        assert_eq!(series.values, vec![3.0, 4.0]);
    }
}
