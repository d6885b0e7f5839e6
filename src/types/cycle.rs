use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a buy/sell trading cycle, as named on the wire.
///
/// Older backends emit the short `buy`/`sell` aliases, newer ones the
/// `order_*` forms; both map onto the same states here. Anything else
/// lands in `Other` so a backend extension never breaks deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleStatus {
    #[serde(rename = "order_buy_placed")]
    BuyPlaced,
    #[serde(rename = "order_buy_filled")]
    BuyFilled,
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "order_sell_placed")]
    SellPlaced,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "completed")]
    Completed,
    #[serde(other)]
    Other,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStatus::BuyPlaced => "order_buy_placed",
            CycleStatus::BuyFilled => "order_buy_filled",
            CycleStatus::Buy => "buy",
            CycleStatus::SellPlaced => "order_sell_placed",
            CycleStatus::Sell => "sell",
            CycleStatus::Completed => "completed",
            CycleStatus::Other => "pending",
        }
    }

    pub fn is_buy_side(&self) -> bool {
        matches!(
            self,
            CycleStatus::BuyPlaced | CycleStatus::BuyFilled | CycleStatus::Buy
        )
    }

    pub fn is_sell_side(&self) -> bool {
        matches!(self, CycleStatus::SellPlaced | CycleStatus::Sell)
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One buy-then-sell trading round, read-only from the dashboard's side.
///
/// `id` is the stable chronological ordering key. For completed cycles both
/// prices are set and `gain()` is realized; for cycles with an active sell
/// order the same formula yields the unrealized (potential) gain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: u64,
    pub status: CycleStatus,
    pub quantity: Decimal,
    #[serde(rename = "buyPrice")]
    pub buy_price: Decimal,
    #[serde(rename = "sellPrice", default)]
    pub sell_price: Decimal,
    #[serde(default)]
    pub percent: Option<Decimal>,
    #[serde(rename = "dedicatedBalance", default)]
    pub dedicated_balance: Option<Decimal>,
    #[serde(rename = "buyId", default)]
    pub buy_order_id: Option<String>,
    #[serde(rename = "sellId", default)]
    pub sell_order_id: Option<String>,
}

impl CycleRecord {
    /// `sell_price * quantity - buy_price * quantity`.
    pub fn gain(&self) -> Decimal {
        self.sell_price * self.quantity - self.buy_price * self.quantity
    }

    /// Gain relative to capital deployed at buy time, in percent.
    /// Zero when the buy leg has no value (guards the division).
    pub fn gain_percent(&self) -> Decimal {
        let invested = self.buy_price * self.quantity;
        if invested.is_zero() {
            return Decimal::ZERO;
        }
        self.gain() / invested * Decimal::from(100)
    }

    pub fn is_completed(&self) -> bool {
        self.status == CycleStatus::Completed
    }

    /// True while a sell order sits on the exchange waiting to fill.
    pub fn has_active_sell_order(&self) -> bool {
        self.status.is_sell_side()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cycle(id: u64, status: CycleStatus, buy: Decimal, sell: Decimal, qty: Decimal) -> CycleRecord {
        CycleRecord {
            id,
            status,
            quantity: qty,
            buy_price: buy,
            sell_price: sell,
            percent: None,
            dedicated_balance: None,
            buy_order_id: None,
            sell_order_id: None,
        }
    }

    #[test]
    fn gain_is_price_delta_times_quantity() {
        let c = cycle(1, CycleStatus::Completed, dec!(100), dec!(110), dec!(2));
        assert_eq!(c.gain(), dec!(20));
        assert_eq!(c.gain_percent(), dec!(10));
    }

    #[test]
    fn gain_percent_guards_zero_investment() {
        let c = cycle(1, CycleStatus::Completed, dec!(0), dec!(110), dec!(2));
        assert_eq!(c.gain_percent(), Decimal::ZERO);
    }

    #[test]
    fn status_wire_names_round_trip() {
        let json = r#""order_sell_placed""#;
        let status: CycleStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, CycleStatus::SellPlaced);
        assert!(status.is_sell_side());
        assert!(!status.is_buy_side());
    }

    #[test]
    fn unknown_status_maps_to_other() {
        let status: CycleStatus = serde_json::from_str(r#""mystery_state""#).unwrap();
        assert_eq!(status, CycleStatus::Other);
    }

    #[test]
    fn record_deserializes_backend_field_names() {
        let json = r#"{
            "id": 42,
            "status": "completed",
            "quantity": 0.005,
            "buyPrice": 60000.0,
            "sellPrice": 61000.0,
            "percent": 5,
            "dedicatedBalance": 300.0
        }"#;
        let c: CycleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, 42);
        assert!(c.is_completed());
        assert_eq!(c.gain(), dec!(5.000));
    }
}
