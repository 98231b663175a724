use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::LedgerConfig;
use crate::customer::Customer;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::loan::total_amount;
use crate::types::CustomerId;

/// requested loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_id: CustomerId,
    pub principal: Money,
    pub interest_rate: Rate,
    pub number_of_installments: u32,
}

impl LoanApplication {
    pub fn new(
        customer_id: CustomerId,
        principal: Money,
        interest_rate: Rate,
        number_of_installments: u32,
    ) -> Self {
        Self {
            customer_id,
            principal,
            interest_rate,
            number_of_installments,
        }
    }

    /// principal × (1 + rate)
    pub fn total_amount(&self) -> Money {
        total_amount(self.principal, self.interest_rate)
    }
}

/// admission control for new loans
pub struct AdmissionControl<'a> {
    config: &'a LedgerConfig,
}

impl<'a> AdmissionControl<'a> {
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    /// check an application against a customer's terms and credit
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// installment count, interest rate, principal, then credit limit.
    /// Returns the total amount the loan would add to the customer's
    /// exposure.
    pub fn assess(&self, customer: &Customer, application: &LoanApplication) -> Result<Money> {
        self.check_installment_count(application.number_of_installments)?;
        self.check_interest_rate(application.interest_rate)?;
        self.check_principal(application.principal)?;

        let total = application.total_amount();
        if !customer.can_afford(total) {
            warn!(
                customer_id = %customer.id,
                limit = %customer.credit_limit,
                used = %customer.used_credit_limit,
                requested = %total,
                "loan rejected: credit limit exceeded"
            );
            return Err(LedgerError::CreditLimitExceeded {
                limit: customer.credit_limit,
                used: customer.used_credit_limit,
                requested: total,
            });
        }

        Ok(total)
    }

    pub fn check_installment_count(&self, count: u32) -> Result<()> {
        if self.config.allows_installment_count(count) {
            return Ok(());
        }
        let allowed = self
            .config
            .origination
            .allowed_installment_counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(LedgerError::invalid_argument(format!(
            "number of installments must be one of {}, got {}",
            allowed, count
        )))
    }

    pub fn check_interest_rate(&self, rate: Rate) -> Result<()> {
        if self.config.allows_interest_rate(rate) {
            return Ok(());
        }
        Err(LedgerError::invalid_argument(format!(
            "interest rate must be between {} and {}, got {}",
            self.config.origination.min_interest_rate.as_decimal(),
            self.config.origination.max_interest_rate.as_decimal(),
            rate.as_decimal()
        )))
    }

    pub fn check_principal(&self, principal: Money) -> Result<()> {
        if principal.is_positive() {
            return Ok(());
        }
        Err(LedgerError::invalid_argument(format!(
            "loan amount must be positive, got {}",
            principal
        )))
    }
}
