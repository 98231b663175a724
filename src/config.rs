use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LedgerError, Result};

/// ledger policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub origination: OriginationConfig,
    pub repayment: RepaymentConfig,
}

/// loan origination limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginationConfig {
    /// permitted schedule lengths
    pub allowed_installment_counts: Vec<u32>,
    /// lowest accepted interest rate (inclusive)
    pub min_interest_rate: Rate,
    /// highest accepted interest rate (inclusive)
    pub max_interest_rate: Rate,
}

/// repayment pricing and eligibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentConfig {
    /// months ahead of today within which unpaid installments can be paid
    pub payment_window_months: u32,
    /// per-day discount for paying before the due date
    pub early_payment_discount_rate: Rate,
    /// per-day penalty for paying after the due date
    pub late_payment_penalty_rate: Rate,
}

impl LedgerConfig {
    /// standard retail loan policy
    pub fn standard() -> Self {
        Self {
            origination: OriginationConfig {
                allowed_installment_counts: vec![6, 9, 12, 24],
                min_interest_rate: Rate::from_decimal(dec!(0.1)),
                max_interest_rate: Rate::from_decimal(dec!(0.5)),
            },
            repayment: RepaymentConfig {
                payment_window_months: 3,
                early_payment_discount_rate: Rate::from_decimal(dec!(0.001)),
                late_payment_penalty_rate: Rate::from_decimal(dec!(0.001)),
            },
        }
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let origination = &self.origination;
        if origination.allowed_installment_counts.is_empty() {
            return Err(LedgerError::InvalidConfiguration {
                message: "at least one installment count must be allowed".to_string(),
            });
        }
        if origination.allowed_installment_counts.contains(&0) {
            return Err(LedgerError::InvalidConfiguration {
                message: "installment count of zero is not schedulable".to_string(),
            });
        }
        if origination.min_interest_rate > origination.max_interest_rate {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "minimum interest rate {} above maximum {}",
                    origination.min_interest_rate, origination.max_interest_rate
                ),
            });
        }
        if self.repayment.payment_window_months == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "payment window must cover at least one month".to_string(),
            });
        }
        if self.repayment.early_payment_discount_rate < Rate::ZERO
            || self.repayment.late_payment_penalty_rate < Rate::ZERO
        {
            return Err(LedgerError::InvalidConfiguration {
                message: "pricing rates cannot be negative".to_string(),
            });
        }
        Ok(())
    }

    pub fn allows_installment_count(&self, count: u32) -> bool {
        self.origination.allowed_installment_counts.contains(&count)
    }

    pub fn allows_interest_rate(&self, rate: Rate) -> bool {
        rate >= self.origination.min_interest_rate && rate <= self.origination.max_interest_rate
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        let config = LedgerConfig::standard();
        assert!(config.validate().is_ok());
        assert!(config.allows_installment_count(12));
        assert!(!config.allows_installment_count(10));
        assert!(config.allows_interest_rate(Rate::from_decimal(dec!(0.1))));
        assert!(config.allows_interest_rate(Rate::from_decimal(dec!(0.5))));
        assert!(!config.allows_interest_rate(Rate::from_decimal(dec!(0.51))));
    }

    #[test]
    fn test_json_roundtrip_keeps_policy() {
        let json = LedgerConfig::standard().to_json_pretty().unwrap();
        let parsed = LedgerConfig::from_json(&json).unwrap();
        assert_eq!(parsed, LedgerConfig::standard());
    }

    #[test]
    fn test_rejects_inverted_rate_bounds() {
        let mut config = LedgerConfig::standard();
        config.origination.min_interest_rate = Rate::from_decimal(dec!(0.6));
        assert!(matches!(
            config.validate(),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_window() {
        let mut config = LedgerConfig::standard();
        config.repayment.payment_window_months = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = LedgerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LedgerError::Serialization { .. }));
    }
}
