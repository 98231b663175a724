use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::CustomerId;

/// customer credit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub surname: String,
    /// ceiling on outstanding loan totals
    pub credit_limit: Money,
    /// current outstanding loan totals
    pub used_credit_limit: Money,
}

impl Customer {
    /// create customer with no exposure
    pub fn new(name: impl Into<String>, surname: impl Into<String>, credit_limit: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            surname: surname.into(),
            credit_limit,
            used_credit_limit: Money::ZERO,
        }
    }

    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.used_credit_limit
    }

    /// whether `amount` more exposure stays within the limit
    pub fn can_afford(&self, amount: Money) -> bool {
        self.used_credit_limit + amount <= self.credit_limit
    }

    /// take on new exposure
    pub fn reserve_credit(&mut self, amount: Money) -> Result<()> {
        if !self.can_afford(amount) {
            return Err(LedgerError::CreditLimitExceeded {
                limit: self.credit_limit,
                used: self.used_credit_limit,
                requested: amount,
            });
        }
        self.used_credit_limit += amount;
        Ok(())
    }

    /// give back exposure settled by repayment
    pub fn release_credit(&mut self, amount: Money) {
        self.used_credit_limit -= amount;
    }
}
