use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::{CustomerId, InstallmentId, LoanId};

/// loan record
///
/// Installments are not embedded; they are fetched from the installment
/// store by loan id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    /// requested amount before interest
    pub principal: Money,
    pub interest_rate: Rate,
    /// total owed: principal × (1 + interest rate)
    pub loan_amount: Money,
    pub number_of_installments: u32,
    pub create_date: NaiveDate,
    pub is_paid: bool,
}

impl Loan {
    pub fn new(
        customer_id: CustomerId,
        principal: Money,
        interest_rate: Rate,
        number_of_installments: u32,
        create_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            principal,
            interest_rate,
            loan_amount: total_amount(principal, interest_rate),
            number_of_installments,
            create_date,
            is_paid: false,
        }
    }

    /// flag the loan settled; returns false if it already was
    pub fn mark_paid(&mut self) -> bool {
        let changed = !self.is_paid;
        self.is_paid = true;
        changed
    }
}

/// total amount owed for a principal at a flat interest rate
pub fn total_amount(principal: Money, interest_rate: Rate) -> Money {
    principal * interest_rate.growth_factor()
}

/// one scheduled repayment of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub is_paid: bool,
}

impl Installment {
    pub fn new(loan_id: LoanId, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            paid_amount: Money::ZERO,
            due_date,
            payment_date: None,
            is_paid: false,
        }
    }

    /// due date falls within `[start, end]`
    pub fn is_due_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.due_date >= start && self.due_date <= end
    }

    /// settle in full at the nominal amount
    pub fn pay(&mut self, payment_date: NaiveDate) {
        self.paid_amount = self.amount;
        self.payment_date = Some(payment_date);
        self.is_paid = true;
    }
}
