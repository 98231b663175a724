pub mod memory;
pub mod transaction;

use chrono::NaiveDate;

use crate::customer::Customer;
use crate::errors::Result;
use crate::loan::{Installment, Loan};
use crate::types::{CustomerId, LoanFilter, LoanId};

pub use memory::{MemoryStore, StoreSnapshot};
pub use transaction::StoreTransaction;

/// customer persistence
pub trait CustomerStore {
    /// fails with `NotFound` when absent
    fn get_customer(&self, id: CustomerId) -> Result<Customer>;

    /// insert or replace
    fn save_customer(&self, customer: Customer) -> Result<Customer>;
}

/// loan persistence
pub trait LoanStore {
    /// fails with `NotFound` when absent
    fn get_loan(&self, id: LoanId) -> Result<Loan>;

    /// insert or replace
    fn save_loan(&self, loan: Loan) -> Result<Loan>;

    /// loans of a customer matching `filter`, in creation order
    fn find_loans_by_customer(
        &self,
        customer_id: CustomerId,
        filter: &LoanFilter,
    ) -> Result<Vec<Loan>>;
}

/// installment persistence
///
/// Finders return installments in the order they were first saved.
pub trait InstallmentStore {
    fn find_by_loan(&self, loan_id: LoanId) -> Result<Vec<Installment>>;

    /// unpaid installments with a due date in `[start, end]`
    fn find_unpaid_due_between(
        &self,
        loan_id: LoanId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Installment>>;

    fn find_unpaid(&self, loan_id: LoanId) -> Result<Vec<Installment>>;

    fn save_installment(&self, installment: Installment) -> Result<Installment>;

    fn save_installments(&self, installments: Vec<Installment>) -> Result<()>;
}

/// the full persistence surface the ledger runs against
pub trait LedgerStore: CustomerStore + LoanStore + InstallmentStore + Send + Sync {
    /// apply every change in the set, or none of them
    fn commit(&self, changes: ChangeSet) -> Result<()>;
}

/// writes staged by one ledger operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub customers: Vec<Customer>,
    pub loans: Vec<Loan>,
    pub installments: Vec<Installment>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.loans.is_empty() && self.installments.is_empty()
    }

    /// stage a customer, replacing an earlier staged copy
    pub fn put_customer(&mut self, customer: Customer) {
        match self.customers.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = customer,
            None => self.customers.push(customer),
        }
    }

    pub fn put_loan(&mut self, loan: Loan) {
        match self.loans.iter_mut().find(|l| l.id == loan.id) {
            Some(existing) => *existing = loan,
            None => self.loans.push(loan),
        }
    }

    pub fn put_installment(&mut self, installment: Installment) {
        match self.installments.iter_mut().find(|i| i.id == installment.id) {
            Some(existing) => *existing = installment,
            None => self.installments.push(installment),
        }
    }
}
