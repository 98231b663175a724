//! serializable read views returned to callers
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::customer::Customer;
use crate::decimal::Money;
use crate::loan::{Installment, Loan};
use crate::types::{CustomerId, LoanId};

/// loan together with its installment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: Money,
    pub number_of_installments: u32,
    pub create_date: NaiveDate,
    pub is_paid: bool,
    pub installments: Vec<Installment>,
}

impl LoanView {
    pub fn new(loan: &Loan, installments: Vec<Installment>) -> Self {
        Self {
            id: loan.id,
            customer_id: loan.customer_id,
            loan_amount: loan.loan_amount,
            number_of_installments: loan.number_of_installments,
            create_date: loan.create_date,
            is_paid: loan.is_paid,
            installments,
        }
    }

    pub fn total_scheduled(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    pub fn outstanding(&self) -> Money {
        self.installments
            .iter()
            .filter(|i| !i.is_paid)
            .map(|i| i.amount)
            .sum()
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// customer credit position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: String,
    pub surname: String,
    pub credit_limit: Money,
    pub used_credit_limit: Money,
    pub available_credit: Money,
}

impl CustomerView {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            surname: customer.surname.clone(),
            credit_limit: customer.credit_limit,
            used_credit_limit: customer.used_credit_limit,
            available_credit: customer.available_credit(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
