use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::MarketPeriod;

/// `$` plus two decimal places, the dashboard's money format.
pub fn currency(value: Decimal) -> String {
    format!("${:.2}", value.to_f64().unwrap_or(0.0))
}

/// Percentage with a fixed number of decimals and a trailing `%`.
pub fn percent(value: Decimal, decimals: usize) -> String {
    format!("{:.*}%", decimals, value.to_f64().unwrap_or(0.0))
}

/// Sign-prefixed percentage for change values: `+1.23%` / `-1.23%`.
pub fn signed_percent(value: Decimal, decimals: usize) -> String {
    let v = value.to_f64().unwrap_or(0.0);
    if v >= 0.0 {
        format!("+{:.*}%", decimals, v)
    } else {
        format!("{:.*}%", decimals, v)
    }
}

/// Abbreviates large magnitudes with K/M/B/T suffixes at the 1e3/1e6/1e9/1e12
/// thresholds. Values below a thousand are printed plain.
pub fn large_number(value: f64, decimals: usize) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.*}T", decimals, value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.*}B", decimals, value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.*}M", decimals, value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.*}K", decimals, value / 1e3)
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Dollar-range label for a histogram bucket. Bucket width picks the
/// precision: sub-dime buckets keep cents, sub-dollar buckets one decimal,
/// anything wider whole dollars.
pub fn bucket_label(lower: Decimal, upper: Decimal) -> String {
    let width = (upper - lower).to_f64().unwrap_or(0.0);
    let (lo, hi) = (lower.to_f64().unwrap_or(0.0), upper.to_f64().unwrap_or(0.0));
    if width < 0.1 {
        format!("${:.2} to ${:.2}", lo, hi)
    } else if width < 1.0 {
        format!("${:.1} to ${:.1}", lo, hi)
    } else {
        format!("${:.0} to ${:.0}", lo, hi)
    }
}

/// Axis label for one point of a period chart. Granularity is a pure
/// function of the requested period, never of how many points came back:
/// hour-of-day for 24h, weekday for 7d, day/month up to 90d, month/year
/// beyond.
pub fn period_label(period: MarketPeriod, timestamp: DateTime<Utc>) -> String {
    match period {
        MarketPeriod::H24 => format!("{}h", timestamp.format("%H")),
        MarketPeriod::D7 => timestamp.format("%a %d").to_string(),
        MarketPeriod::D30 | MarketPeriod::D90 => timestamp.format("%d %b").to_string(),
        MarketPeriod::D180 | MarketPeriod::D365 => timestamp.format("%b %y").to_string(),
        MarketPeriod::Max => timestamp.format("%b %Y").to_string(),
    }
}

/// Labels for a series of `len` points ending now, spaced by the period's
/// assumed sampling step. Used when the backend returns bare price arrays
/// (sparklines) without timestamps.
pub fn synthetic_period_labels(period: MarketPeriod, len: usize, now: DateTime<Utc>) -> Vec<String> {
    let step = Duration::seconds(period.synthetic_step_secs());
    (0..len)
        .map(|i| {
            let ts = now - step * (len - 1 - i) as i32;
            period_label(period, ts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_two_decimals() {
        assert_eq!(currency(dec!(1234.5)), "$1234.50");
        assert_eq!(currency(dec!(-3.456)), "$-3.46");
    }

    #[test]
    fn signed_percent_prefixes_positive() {
        assert_eq!(signed_percent(dec!(2.5), 2), "+2.50%");
        assert_eq!(signed_percent(dec!(-1.234), 2), "-1.23%");
        assert_eq!(signed_percent(Decimal::ZERO, 1), "+0.0%");
    }

    #[test]
    fn large_number_suffixes() {
        assert_eq!(large_number(1_500_000_000.0, 2), "1.50B");
        assert_eq!(large_number(950.0, 2), "950.00");
        assert_eq!(large_number(2_400.0, 2), "2.40K");
        assert_eq!(large_number(3_000_000.0, 2), "3.00M");
        assert_eq!(large_number(1.2e12, 2), "1.20T");
    }

    #[test]
    fn bucket_label_precision_tracks_width() {
        assert_eq!(bucket_label(dec!(0.01), dec!(0.05)), "$0.01 to $0.05");
        assert_eq!(bucket_label(dec!(0.5), dec!(1.0)), "$0.5 to $1.0");
        assert_eq!(bucket_label(dec!(10), dec!(25)), "$10 to $25");
    }

    #[test]
    fn period_label_granularity() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();
        assert_eq!(period_label(MarketPeriod::H24, ts), "14h");
        assert_eq!(period_label(MarketPeriod::D7, ts), "Fri 15");
        assert_eq!(period_label(MarketPeriod::D30, ts), "15 Mar");
        assert_eq!(period_label(MarketPeriod::D365, ts), "Mar 24");
        assert_eq!(period_label(MarketPeriod::Max, ts), "Mar 2024");
    }

    #[test]
    fn synthetic_labels_count_and_order() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let labels = synthetic_period_labels(MarketPeriod::H24, 3, now);
        assert_eq!(labels, vec!["10h", "11h", "12h"]);
    }
}
