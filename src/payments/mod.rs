pub mod allocation;
pub mod pricing;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::LoanId;

pub use allocation::{Allocation, PaymentAllocator};
pub use pricing::{InstallmentPricing, PricingEngine};

/// payment request against a loan
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub loan_id: LoanId,
    pub amount: Money,
}

impl PaymentRequest {
    pub fn new(loan_id: LoanId, amount: Money) -> Self {
        Self { loan_id, amount }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::invalid_argument(format!(
                "payment amount must be positive: {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// result of a payment call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub loan_id: LoanId,
    pub installments_paid: u32,
    /// sum of nominal installment amounts settled
    pub total_amount_spent: Money,
    pub loan_fully_paid: bool,
    pub payment_date: NaiveDate,
    /// part of the payment left unapplied
    pub unapplied_amount: Money,
    /// discount / penalty pricing of each settled installment
    pub pricing: Vec<InstallmentPricing>,
}

impl PaymentResult {
    pub fn from_allocation(
        loan_id: LoanId,
        allocation: Allocation,
        loan_fully_paid: bool,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            loan_id,
            installments_paid: allocation.installments_paid(),
            total_amount_spent: allocation.total_amount_spent,
            loan_fully_paid,
            payment_date,
            unapplied_amount: allocation.unapplied,
            pricing: allocation.pricing,
        }
    }

    /// effective amount after discounts and penalties
    pub fn effective_amount(&self) -> Money {
        self.pricing.iter().map(|p| p.effective_amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_non_positive_payment_rejected() {
        let loan_id = Uuid::new_v4();
        assert!(PaymentRequest::new(loan_id, Money::ZERO).validate().is_err());
        assert!(PaymentRequest::new(loan_id, Money::from_major(-5)).validate().is_err());
        assert!(PaymentRequest::new(loan_id, Money::from_major(5)).validate().is_ok());
    }
}
