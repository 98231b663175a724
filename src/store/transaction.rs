use chrono::NaiveDate;

use crate::customer::Customer;
use crate::errors::Result;
use crate::loan::{Installment, Loan};
use crate::types::{CustomerId, LoanId};

use super::{ChangeSet, LedgerStore};

/// unit of work over a ledger store
///
/// Writes are staged in a `ChangeSet` and only reach the store on
/// `commit`. Reads see staged writes first, so an operation observes its
/// own effects before committing. Dropping the transaction discards
/// everything staged.
pub struct StoreTransaction<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    changes: ChangeSet,
}

impl<'a, S: LedgerStore + ?Sized> StoreTransaction<'a, S> {
    pub fn begin(store: &'a S) -> Self {
        Self {
            store,
            changes: ChangeSet::default(),
        }
    }

    pub fn get_customer(&self, id: CustomerId) -> Result<Customer> {
        match self.changes.customers.iter().find(|c| c.id == id) {
            Some(staged) => Ok(staged.clone()),
            None => self.store.get_customer(id),
        }
    }

    pub fn get_loan(&self, id: LoanId) -> Result<Loan> {
        match self.changes.loans.iter().find(|l| l.id == id) {
            Some(staged) => Ok(staged.clone()),
            None => self.store.get_loan(id),
        }
    }

    pub fn find_unpaid(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        let stored = self.store.find_unpaid(loan_id)?;
        Ok(self.overlay(loan_id, stored, |_| true))
    }

    pub fn find_unpaid_due_between(
        &self,
        loan_id: LoanId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Installment>> {
        let stored = self.store.find_unpaid_due_between(loan_id, start, end)?;
        Ok(self.overlay(loan_id, stored, |i| i.is_due_between(start, end)))
    }

    pub fn save_customer(&mut self, customer: Customer) {
        self.changes.put_customer(customer);
    }

    pub fn save_loan(&mut self, loan: Loan) {
        self.changes.put_loan(loan);
    }

    pub fn save_installment(&mut self, installment: Installment) {
        self.changes.put_installment(installment);
    }

    pub fn save_installments(&mut self, installments: impl IntoIterator<Item = Installment>) {
        for installment in installments {
            self.changes.put_installment(installment);
        }
    }

    /// write all staged changes to the store at once
    pub fn commit(self) -> Result<()> {
        if self.changes.is_empty() {
            return Ok(());
        }
        self.store.commit(self.changes)
    }

    // staged copies replace stored rows; staged rows still unpaid and
    // matching `keep` are added
    fn overlay(
        &self,
        loan_id: LoanId,
        mut stored: Vec<Installment>,
        keep: impl Fn(&Installment) -> bool,
    ) -> Vec<Installment> {
        let staged: Vec<&Installment> = self
            .changes
            .installments
            .iter()
            .filter(|i| i.loan_id == loan_id)
            .collect();

        stored.retain(|row| !staged.iter().any(|s| s.id == row.id));
        stored.extend(
            staged
                .into_iter()
                .filter(|i| !i.is_paid && keep(*i))
                .cloned(),
        );
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::errors::LedgerError;
    use crate::store::{CustomerStore, InstallmentStore, MemoryStore};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reads_see_staged_writes() {
        let store = MemoryStore::new();
        let customer = Customer::new("Jane", "Roe", Money::from_major(500));
        let id = customer.id;

        let mut tx = StoreTransaction::begin(&store);
        tx.save_customer(customer);

        assert!(tx.get_customer(id).is_ok());
        assert!(matches!(store.get_customer(id), Err(LedgerError::NotFound { .. })));

        tx.commit().unwrap();
        assert!(store.get_customer(id).is_ok());
    }

    #[test]
    fn test_dropped_transaction_discards_changes() {
        let store = MemoryStore::new();
        let customer = Customer::new("Jane", "Roe", Money::from_major(500));
        let id = customer.id;

        {
            let mut tx = StoreTransaction::begin(&store);
            tx.save_customer(customer);
        }

        assert!(store.get_customer(id).is_err());
    }

    #[test]
    fn test_unpaid_overlay_excludes_staged_payments() {
        let store = MemoryStore::new();
        let loan_id = Uuid::new_v4();
        let first = Installment::new(loan_id, Money::from_major(100), date(2024, 2, 1));
        let second = Installment::new(loan_id, Money::from_major(100), date(2024, 3, 1));
        store.save_installments(vec![first.clone(), second.clone()]).unwrap();

        let mut tx = StoreTransaction::begin(&store);
        let mut paid = first.clone();
        paid.pay(date(2024, 1, 20));
        tx.save_installment(paid);

        let unpaid = tx.find_unpaid(loan_id).unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].id, second.id);

        // store is untouched until commit
        assert_eq!(store.find_unpaid(loan_id).unwrap().len(), 2);
    }

    #[test]
    fn test_staged_new_installments_are_visible() {
        let store = MemoryStore::new();
        let loan_id = Uuid::new_v4();

        let mut tx = StoreTransaction::begin(&store);
        tx.save_installments(vec![
            Installment::new(loan_id, Money::from_major(100), date(2024, 2, 1)),
            Installment::new(loan_id, Money::from_major(100), date(2024, 9, 1)),
        ]);

        let window = tx
            .find_unpaid_due_between(loan_id, date(2024, 1, 15), date(2024, 4, 15))
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(tx.find_unpaid(loan_id).unwrap().len(), 2);
    }
}
