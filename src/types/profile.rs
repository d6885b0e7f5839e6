use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Saved bot configuration preset, managed through `/api/profiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingProfile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub buy_offset: i64,
    pub sell_offset: i64,
    pub percent: Decimal,
}

/// Payload for creating or updating a profile (no server-assigned id yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub buy_offset: i64,
    pub sell_offset: i64,
    pub percent: Decimal,
}

impl ProfileDraft {
    /// Mirror of the form validation the backend applies.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("profile name is required".to_string());
        }
        if self.percent < Decimal::ZERO || self.percent > Decimal::from(100) {
            return Err("percent must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn draft_validation() {
        let mut draft = ProfileDraft {
            name: "Aggressive".to_string(),
            description: None,
            buy_offset: -150,
            sell_offset: 300,
            percent: dec!(10),
        };
        assert!(draft.validate().is_ok());

        draft.name = "   ".to_string();
        assert!(draft.validate().is_err());

        draft.name = "ok".to_string();
        draft.percent = dec!(120);
        assert!(draft.validate().is_err());
    }
}
