use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::CycleRecord;

/// Default trailing-window length for the average-gain evolution series.
pub const DEFAULT_AVG_WINDOW: usize = 10;
/// Default trailing-window length for the success-rate evolution series.
pub const DEFAULT_SUCCESS_WINDOW: usize = 20;
/// Default bucket count for the gains distribution histogram.
pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 8;
/// Row count of the top/bottom trade rankings.
pub const RANKING_SIZE: usize = 10;

/// Derived statistics over one refresh of the cycle list. Ephemeral:
/// recomputed from scratch on every pass, discarded on the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleAnalytics {
    pub completed_count: u64,
    pub profitable_count: u64,
    pub losing_count: u64,
    /// `100 * profitable / completed`, 0 when nothing completed yet.
    pub success_rate: Decimal,
    pub avg_gain: Decimal,
    /// Population standard deviation of per-cycle gain.
    pub volatility: Decimal,
    pub best_gain: Decimal,
    pub best_gain_cycle: Option<u64>,
    pub worst_gain: Decimal,
    pub worst_gain_cycle: Option<u64>,
    pub total_gains: Decimal,
    pub total_losses: Decimal,
}

impl CycleAnalytics {
    fn empty() -> Self {
        Self {
            completed_count: 0,
            profitable_count: 0,
            losing_count: 0,
            success_rate: Decimal::ZERO,
            avg_gain: Decimal::ZERO,
            volatility: Decimal::ZERO,
            best_gain: Decimal::ZERO,
            best_gain_cycle: None,
            worst_gain: Decimal::ZERO,
            worst_gain_cycle: None,
            total_gains: Decimal::ZERO,
            total_losses: Decimal::ZERO,
        }
    }
}

/// One bucket of the gains distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainBucket {
    pub lower: Decimal,
    pub upper: Decimal,
    pub count: u64,
}

/// One (cycle id, value) point of a derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub cycle_id: u64,
    pub value: Decimal,
}

/// Pure aggregation over cycle records. Never touches the network and
/// returns the documented zero bundle instead of failing on empty input.
pub struct AnalyticsCalculator;

impl AnalyticsCalculator {
    /// Headline statistics over the completed cycles only; open positions
    /// are excluded because their gain is not realized yet.
    pub fn calculate(cycles: &[CycleRecord]) -> CycleAnalytics {
        let completed = Self::completed_sorted(cycles);
        if completed.is_empty() {
            return CycleAnalytics::empty();
        }

        let gains: Vec<Decimal> = completed.iter().map(|c| c.gain()).collect();
        let count = Decimal::from(completed.len());

        let mut profitable = 0u64;
        let mut losing = 0u64;
        let mut total_gains = Decimal::ZERO;
        let mut total_losses = Decimal::ZERO;
        for gain in &gains {
            if *gain > Decimal::ZERO {
                profitable += 1;
                total_gains += *gain;
            } else if *gain < Decimal::ZERO {
                losing += 1;
                total_losses += gain.abs();
            }
        }

        let total: Decimal = gains.iter().copied().sum();
        let avg_gain = total / count;
        let success_rate = Decimal::from(profitable) / count * dec!(100);

        // Best/worst carry the owning cycle id; ties keep the earliest
        // cycle so the answer is deterministic.
        let mut best = (completed[0].gain(), completed[0].id);
        let mut worst = best;
        for c in &completed {
            let gain = c.gain();
            if gain > best.0 {
                best = (gain, c.id);
            }
            if gain < worst.0 {
                worst = (gain, c.id);
            }
        }

        CycleAnalytics {
            completed_count: completed.len() as u64,
            profitable_count: profitable,
            losing_count: losing,
            success_rate,
            avg_gain,
            volatility: Self::population_std_dev(&gains, avg_gain),
            best_gain: best.0,
            best_gain_cycle: Some(best.1),
            worst_gain: worst.0,
            worst_gain_cycle: Some(worst.1),
            total_gains,
            total_losses,
        }
    }

    /// Trailing-window mean gain over completed cycles in id order.
    /// Output length is `N - window + 1`; empty when `N < window`.
    pub fn rolling_average(cycles: &[CycleRecord], window: usize) -> Vec<SeriesPoint> {
        let completed = Self::completed_sorted(cycles);
        Self::rolling(&completed, window, |w| {
            let total: Decimal = w.iter().map(|c| c.gain()).sum();
            total / Decimal::from(w.len())
        })
    }

    /// Trailing-window share of profitable cycles, as a percentage.
    pub fn rolling_success_rate(cycles: &[CycleRecord], window: usize) -> Vec<SeriesPoint> {
        let completed = Self::completed_sorted(cycles);
        Self::rolling(&completed, window, |w| {
            let profitable = w.iter().filter(|c| c.gain() > Decimal::ZERO).count();
            Decimal::from(profitable) / Decimal::from(w.len()) * dec!(100)
        })
    }

    /// Running sum of gain in id order, one point per completed cycle.
    pub fn cumulative_series(cycles: &[CycleRecord]) -> Vec<SeriesPoint> {
        let completed = Self::completed_sorted(cycles);
        let mut cumulative = Decimal::ZERO;
        completed
            .iter()
            .map(|c| {
                cumulative += c.gain();
                SeriesPoint {
                    cycle_id: c.id,
                    value: cumulative,
                }
            })
            .collect()
    }

    /// Equal-width buckets over `[min, max]`. Every bucket is half-open
    /// `[lower, upper)` except the last, which includes its upper bound so
    /// the maximum gain is counted instead of silently dropped. When all
    /// gains are equal the result collapses to a single `[min, max]` bucket
    /// holding everything.
    pub fn histogram(gains: &[Decimal], bucket_count: usize) -> Vec<GainBucket> {
        if gains.is_empty() || bucket_count == 0 {
            return Vec::new();
        }

        let mut min = gains[0];
        let mut max = gains[0];
        for g in gains {
            if *g < min {
                min = *g;
            }
            if *g > max {
                max = *g;
            }
        }

        if min == max {
            return vec![GainBucket {
                lower: min,
                upper: max,
                count: gains.len() as u64,
            }];
        }

        let width = (max - min) / Decimal::from(bucket_count);
        let mut buckets: Vec<GainBucket> = (0..bucket_count)
            .map(|i| GainBucket {
                lower: min + width * Decimal::from(i),
                upper: min + width * Decimal::from(i + 1),
                count: 0,
            })
            .collect();
        // Quantization of `width` can leave the computed top edge a hair
        // off the true maximum.
        buckets[bucket_count - 1].upper = max;

        let last = bucket_count - 1;
        for g in gains {
            let idx = buckets
                .iter()
                .position(|b| *g >= b.lower && *g < b.upper)
                .unwrap_or(last);
            buckets[idx].count += 1;
        }

        buckets
    }

    /// Best `n` completed cycles by gain, descending; ties break toward the
    /// lower cycle id.
    pub fn top_trades(cycles: &[CycleRecord], n: usize) -> Vec<CycleRecord> {
        let mut completed = Self::completed_sorted(cycles);
        completed.sort_by(|a, b| b.gain().cmp(&a.gain()).then(a.id.cmp(&b.id)));
        completed.truncate(n);
        completed
    }

    /// Worst `n` completed cycles by gain, ascending; same tie-break.
    /// Entries can still be profitable when the book has few losers.
    pub fn bottom_trades(cycles: &[CycleRecord], n: usize) -> Vec<CycleRecord> {
        let mut completed = Self::completed_sorted(cycles);
        completed.sort_by(|a, b| a.gain().cmp(&b.gain()).then(a.id.cmp(&b.id)));
        completed.truncate(n);
        completed
    }

    /// Unrealized gain locked in by active sell orders. Uses the same gain
    /// formula as completed cycles; these are open positions, so the value
    /// is potential, not realized.
    pub fn potential_gain(cycles: &[CycleRecord]) -> Decimal {
        cycles
            .iter()
            .filter(|c| c.has_active_sell_order())
            .map(|c| c.gain())
            .sum()
    }

    fn completed_sorted(cycles: &[CycleRecord]) -> Vec<CycleRecord> {
        let mut completed: Vec<CycleRecord> = cycles
            .iter()
            .filter(|c| c.is_completed())
            .cloned()
            .collect();
        completed.sort_by_key(|c| c.id);
        completed
    }

    fn rolling<F>(completed: &[CycleRecord], window: usize, aggregate: F) -> Vec<SeriesPoint>
    where
        F: Fn(&[CycleRecord]) -> Decimal,
    {
        if window == 0 || completed.len() < window {
            return Vec::new();
        }
        (window - 1..completed.len())
            .map(|i| SeriesPoint {
                cycle_id: completed[i].id,
                value: aggregate(&completed[i + 1 - window..=i]),
            })
            .collect()
    }

    fn population_std_dev(gains: &[Decimal], mean: Decimal) -> Decimal {
        if gains.is_empty() {
            return Decimal::ZERO;
        }
        // Decimal has no square root; go through f64 for it and come back.
        let variance = gains
            .iter()
            .map(|g| {
                let d = (*g - mean).to_f64().unwrap_or(0.0);
                d * d
            })
            .sum::<f64>()
            / gains.len() as f64;
        Decimal::from_f64_retain(variance.sqrt()).unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CycleStatus;

    fn completed(id: u64, buy: Decimal, sell: Decimal, qty: Decimal) -> CycleRecord {
        CycleRecord {
            id,
            status: CycleStatus::Completed,
            quantity: qty,
            buy_price: buy,
            sell_price: sell,
            percent: None,
            dedicated_balance: None,
            buy_order_id: None,
            sell_order_id: None,
        }
    }

    /// Cycles with gains [10, -5, 20, -5] for ids 1..=4, quantity 1.
    fn fixture() -> Vec<CycleRecord> {
        vec![
            completed(1, dec!(100), dec!(110), dec!(1)),
            completed(2, dec!(100), dec!(95), dec!(1)),
            completed(3, dec!(100), dec!(120), dec!(1)),
            completed(4, dec!(100), dec!(95), dec!(1)),
        ]
    }

    #[test]
    fn empty_input_yields_zero_bundle() {
        let stats = AnalyticsCalculator::calculate(&[]);
        assert_eq!(stats.completed_count, 0);
        assert_eq!(stats.success_rate, Decimal::ZERO);
        assert_eq!(stats.avg_gain, Decimal::ZERO);
        assert_eq!(stats.volatility, Decimal::ZERO);
        assert_eq!(stats.best_gain, Decimal::ZERO);
        assert_eq!(stats.best_gain_cycle, None);
    }

    #[test]
    fn open_cycles_are_excluded_from_headline_stats() {
        let mut cycles = fixture();
        cycles.push(CycleRecord {
            id: 5,
            status: CycleStatus::SellPlaced,
            quantity: dec!(1),
            buy_price: dec!(100),
            sell_price: dec!(500),
            percent: None,
            dedicated_balance: None,
            buy_order_id: None,
            sell_order_id: None,
        });
        let stats = AnalyticsCalculator::calculate(&cycles);
        assert_eq!(stats.completed_count, 4);
        assert_eq!(stats.best_gain, dec!(20));
    }

    #[test]
    fn headline_stats_match_known_gains() {
        let stats = AnalyticsCalculator::calculate(&fixture());
        assert_eq!(stats.success_rate, dec!(50));
        assert_eq!(stats.avg_gain, dec!(5));
        assert_eq!(stats.profitable_count, 2);
        assert_eq!(stats.losing_count, 2);
        assert_eq!(stats.best_gain, dec!(20));
        assert_eq!(stats.best_gain_cycle, Some(3));
        assert_eq!(stats.worst_gain, dec!(-5));
        assert_eq!(stats.worst_gain_cycle, Some(2));
        assert_eq!(stats.total_gains, dec!(30));
        assert_eq!(stats.total_losses, dec!(10));
    }

    #[test]
    fn volatility_is_population_std_dev() {
        // Gains [10, -5, 20, -5], mean 5, variance (25+100+225+100)/4.
        let stats = AnalyticsCalculator::calculate(&fixture());
        let expected = (450.0f64 / 4.0).sqrt();
        let got = stats.volatility.to_f64().unwrap();
        assert!((got - expected).abs() < 1e-9, "got {got}, want {expected}");
    }

    #[test]
    fn rolling_average_window_two() {
        let points = AnalyticsCalculator::rolling_average(&fixture(), 2);
        let values: Vec<Decimal> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(2.5), dec!(7.5), dec!(7.5)]);
        assert_eq!(points[0].cycle_id, 2);
        assert_eq!(points[2].cycle_id, 4);
    }

    #[test]
    fn rolling_average_short_input_is_empty() {
        assert!(AnalyticsCalculator::rolling_average(&fixture(), 5).is_empty());
        assert!(AnalyticsCalculator::rolling_average(&fixture(), 0).is_empty());
    }

    #[test]
    fn rolling_success_rate_window_two() {
        let points = AnalyticsCalculator::rolling_success_rate(&fixture(), 2);
        let values: Vec<Decimal> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(50), dec!(50), dec!(50)]);
    }

    #[test]
    fn cumulative_series_runs_in_id_order() {
        let points = AnalyticsCalculator::cumulative_series(&fixture());
        let values: Vec<Decimal> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(10), dec!(5), dec!(25), dec!(20)]);
    }

    #[test]
    fn histogram_each_integer_in_own_bucket() {
        let gains: Vec<Decimal> = (0..8).map(Decimal::from).collect();
        let buckets = AnalyticsCalculator::histogram(&gains, 8);
        assert_eq!(buckets.len(), 8);
        for b in &buckets {
            assert_eq!(b.count, 1, "bucket {:?}", b);
        }
        // max == 7 sits in the last (closed) bucket, not dropped
        assert_eq!(buckets[7].upper, dec!(7));
    }

    #[test]
    fn histogram_all_equal_collapses_to_single_bucket() {
        let gains = vec![dec!(3.5); 4];
        let buckets = AnalyticsCalculator::histogram(&gains, 8);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].lower, dec!(3.5));
        assert_eq!(buckets[0].upper, dec!(3.5));
        assert_eq!(buckets[0].count, 4);
    }

    #[test]
    fn histogram_empty_input() {
        assert!(AnalyticsCalculator::histogram(&[], 8).is_empty());
    }

    #[test]
    fn rankings_are_deterministic_on_ties() {
        let top = AnalyticsCalculator::top_trades(&fixture(), 1);
        assert_eq!(top[0].id, 3);

        // ids 2 and 4 both have gain -5; the lower id wins
        let bottom = AnalyticsCalculator::bottom_trades(&fixture(), 1);
        assert_eq!(bottom[0].id, 2);

        let bottom2 = AnalyticsCalculator::bottom_trades(&fixture(), 2);
        assert_eq!(bottom2[1].id, 4);
    }

    #[test]
    fn potential_gain_counts_only_sell_side_cycles() {
        let cycles = vec![
            CycleRecord {
                id: 1,
                status: CycleStatus::SellPlaced,
                quantity: dec!(2),
                buy_price: dec!(100),
                sell_price: dec!(105),
                percent: None,
                dedicated_balance: None,
                buy_order_id: None,
                sell_order_id: None,
            },
            CycleRecord {
                id: 2,
                status: CycleStatus::BuyPlaced,
                quantity: dec!(1),
                buy_price: dec!(100),
                sell_price: dec!(200),
                percent: None,
                dedicated_balance: None,
                buy_order_id: None,
                sell_order_id: None,
            },
        ];
        assert_eq!(AnalyticsCalculator::potential_gain(&cycles), dec!(10));
    }
}
