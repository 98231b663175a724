use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{CustomerId, InstallmentId, LoanId};

/// all events recorded by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    CustomerRegistered {
        customer_id: CustomerId,
        credit_limit: Money,
        timestamp: DateTime<Utc>,
    },

    // origination events
    LoanOriginated {
        loan_id: LoanId,
        customer_id: CustomerId,
        principal: Money,
        interest_rate: Rate,
        loan_amount: Money,
        number_of_installments: u32,
        first_due_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    CreditLimitReserved {
        customer_id: CustomerId,
        amount: Money,
        used_credit_limit: Money,
        timestamp: DateTime<Utc>,
    },

    // repayment events
    InstallmentPaid {
        loan_id: LoanId,
        installment_id: InstallmentId,
        due_date: NaiveDate,
        nominal_amount: Money,
        effective_amount: Money,
        days_before_due: i64,
        payment_date: NaiveDate,
    },
    PaymentReceived {
        loan_id: LoanId,
        amount: Money,
        installments_paid: u32,
        amount_applied: Money,
        timestamp: DateTime<Utc>,
    },
    CreditLimitReleased {
        customer_id: CustomerId,
        amount: Money,
        used_credit_limit: Money,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        customer_id: CustomerId,
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    pub fn loan_id(&self) -> Option<LoanId> {
        match self {
            LedgerEvent::LoanOriginated { loan_id, .. }
            | LedgerEvent::InstallmentPaid { loan_id, .. }
            | LedgerEvent::PaymentReceived { loan_id, .. }
            | LedgerEvent::LoanSettled { loan_id, .. } => Some(*loan_id),
            LedgerEvent::CustomerRegistered { .. }
            | LedgerEvent::CreditLimitReserved { .. }
            | LedgerEvent::CreditLimitReleased { .. } => None,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// move every event from `other` into this store
    pub fn append(&mut self, other: &mut EventStore) {
        self.events.append(&mut other.events);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
