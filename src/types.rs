use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::loan::Loan;

/// unique identifier for a customer (also the identity of a customer user)
pub type CustomerId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// caller roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// bank staff, may act on any customer
    Admin,
    /// customer acting on their own records
    Customer,
}

/// kind of ledger record, used in lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Customer,
    Loan,
    Installment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Customer => write!(f, "customer"),
            EntityKind::Loan => write!(f, "loan"),
            EntityKind::Installment => write!(f, "installment"),
        }
    }
}

/// optional loan listing filters, combined by equality conjunction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoanFilter {
    pub installment_count: Option<u32>,
    pub is_paid: Option<bool>,
}

impl LoanFilter {
    /// filter that matches every loan
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_installment_count(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self
    }

    pub fn with_paid(mut self, is_paid: bool) -> Self {
        self.is_paid = Some(is_paid);
        self
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        self.installment_count
            .map_or(true, |count| loan.number_of_installments == count)
            && self.is_paid.map_or(true, |paid| loan.is_paid == paid)
    }
}
