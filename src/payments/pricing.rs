use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::RepaymentConfig;
use crate::decimal::{Money, Rate};
use crate::loan::Installment;
use crate::types::InstallmentId;

/// time-value adjustment for an installment paid on a given date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPricing {
    pub installment_id: InstallmentId,
    pub due_date: NaiveDate,
    pub payment_date: NaiveDate,
    /// positive when paid early, negative when paid late
    pub days_before_due: i64,
    pub nominal_amount: Money,
    pub discount: Money,
    pub penalty: Money,
    /// nominal amount less discount plus penalty
    pub effective_amount: Money,
}

impl InstallmentPricing {
    pub fn is_early(&self) -> bool {
        self.days_before_due > 0
    }

    pub fn is_late(&self) -> bool {
        self.days_before_due < 0
    }
}

/// per-day discount / penalty pricing of installment payments
#[derive(Debug, Clone)]
pub struct PricingEngine {
    pub discount_rate: Rate,
    pub penalty_rate: Rate,
}

impl PricingEngine {
    pub fn new(discount_rate: Rate, penalty_rate: Rate) -> Self {
        Self {
            discount_rate,
            penalty_rate,
        }
    }

    pub fn from_config(config: &RepaymentConfig) -> Self {
        Self::new(config.early_payment_discount_rate, config.late_payment_penalty_rate)
    }

    /// price an installment paid on `payment_date`
    pub fn price(&self, installment: &Installment, payment_date: NaiveDate) -> InstallmentPricing {
        let nominal = installment.amount;
        let days = (installment.due_date - payment_date).num_days();
        let day_count = u32::try_from(days.unsigned_abs()).unwrap_or(u32::MAX);

        let (discount, penalty) = if days > 0 {
            (nominal.apply_daily_rate(self.discount_rate, day_count), Money::ZERO)
        } else if days < 0 {
            (Money::ZERO, nominal.apply_daily_rate(self.penalty_rate, day_count))
        } else {
            (Money::ZERO, Money::ZERO)
        };

        InstallmentPricing {
            installment_id: installment.id,
            due_date: installment.due_date,
            payment_date,
            days_before_due: days,
            nominal_amount: nominal,
            discount,
            penalty,
            effective_amount: nominal - discount + penalty,
        }
    }
}
