use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::customer::Customer;
use crate::errors::{LedgerError, Result};
use crate::loan::{Installment, Loan};
use crate::types::{CustomerId, EntityKind, LoanFilter, LoanId};

use super::{ChangeSet, CustomerStore, InstallmentStore, LedgerStore, LoanStore};

#[derive(Debug, Default)]
struct Tables {
    customers: HashMap<CustomerId, Customer>,
    loans: HashMap<LoanId, Loan>,
    // creation order per customer
    loans_by_customer: HashMap<CustomerId, Vec<LoanId>>,
    // save order per loan
    installments: HashMap<LoanId, Vec<Installment>>,
}

impl Tables {
    fn put_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    fn put_loan(&mut self, loan: Loan) {
        if !self.loans.contains_key(&loan.id) {
            self.loans_by_customer
                .entry(loan.customer_id)
                .or_default()
                .push(loan.id);
        }
        self.loans.insert(loan.id, loan);
    }

    fn put_installment(&mut self, installment: Installment) {
        let rows = self.installments.entry(installment.loan_id).or_default();
        match rows.iter_mut().find(|row| row.id == installment.id) {
            Some(existing) => *existing = installment,
            None => rows.push(installment),
        }
    }

    fn unpaid(&self, loan_id: LoanId) -> impl Iterator<Item = &Installment> {
        self.installments
            .get(&loan_id)
            .into_iter()
            .flatten()
            .filter(|row| !row.is_paid)
    }
}

/// in-process ledger store
///
/// All tables sit behind one lock, so a commit is applied atomically with
/// respect to every reader.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// copy of every record, in store order
    pub fn snapshot(&self) -> StoreSnapshot {
        let tables = self.tables.read();

        let mut customers: Vec<Customer> = tables.customers.values().cloned().collect();
        customers.sort_by(|a, b| (&a.surname, &a.name, a.id).cmp(&(&b.surname, &b.name, b.id)));

        let mut owners: Vec<&CustomerId> = tables.loans_by_customer.keys().collect();
        owners.sort();

        let mut loans = Vec::new();
        for owner in owners {
            for loan_id in &tables.loans_by_customer[owner] {
                if let Some(loan) = tables.loans.get(loan_id) {
                    loans.push(loan.clone());
                }
            }
        }

        // installments of unknown loans go last
        let mut orphaned: Vec<&LoanId> = tables
            .installments
            .keys()
            .filter(|id| !tables.loans.contains_key(*id))
            .collect();
        orphaned.sort();

        let installments = loans
            .iter()
            .map(|loan| &loan.id)
            .chain(orphaned)
            .filter_map(|id| tables.installments.get(id))
            .flatten()
            .cloned()
            .collect();

        StoreSnapshot {
            customers,
            loans,
            installments,
        }
    }

    /// rebuild a store from a snapshot
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut tables = Tables::default();
        for customer in snapshot.customers {
            tables.put_customer(customer);
        }
        for loan in snapshot.loans {
            tables.put_loan(loan);
        }
        for installment in snapshot.installments {
            tables.put_installment(installment);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl CustomerStore for MemoryStore {
    fn get_customer(&self, id: CustomerId) -> Result<Customer> {
        self.tables
            .read()
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found(EntityKind::Customer, id))
    }

    fn save_customer(&self, customer: Customer) -> Result<Customer> {
        self.tables.write().put_customer(customer.clone());
        Ok(customer)
    }
}

impl LoanStore for MemoryStore {
    fn get_loan(&self, id: LoanId) -> Result<Loan> {
        self.tables
            .read()
            .loans
            .get(&id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found(EntityKind::Loan, id))
    }

    fn save_loan(&self, loan: Loan) -> Result<Loan> {
        self.tables.write().put_loan(loan.clone());
        Ok(loan)
    }

    fn find_loans_by_customer(
        &self,
        customer_id: CustomerId,
        filter: &LoanFilter,
    ) -> Result<Vec<Loan>> {
        let tables = self.tables.read();
        let loans = tables
            .loans_by_customer
            .get(&customer_id)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.loans.get(id))
            .filter(|loan| filter.matches(loan))
            .cloned()
            .collect();
        Ok(loans)
    }
}

impl InstallmentStore for MemoryStore {
    fn find_by_loan(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        Ok(self
            .tables
            .read()
            .installments
            .get(&loan_id)
            .cloned()
            .unwrap_or_default())
    }

    fn find_unpaid_due_between(
        &self,
        loan_id: LoanId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Installment>> {
        let tables = self.tables.read();
        let rows = tables
            .unpaid(loan_id)
            .filter(|row| row.is_due_between(start, end))
            .cloned()
            .collect();
        Ok(rows)
    }

    fn find_unpaid(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        let tables = self.tables.read();
        let rows = tables.unpaid(loan_id).cloned().collect();
        Ok(rows)
    }

    fn save_installment(&self, installment: Installment) -> Result<Installment> {
        self.tables.write().put_installment(installment.clone());
        Ok(installment)
    }

    fn save_installments(&self, installments: Vec<Installment>) -> Result<()> {
        let mut tables = self.tables.write();
        for installment in installments {
            tables.put_installment(installment);
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut tables = self.tables.write();
        for customer in changes.customers {
            tables.put_customer(customer);
        }
        for loan in changes.loans {
            tables.put_loan(loan);
        }
        for installment in changes.installments {
            tables.put_installment(installment);
        }
        Ok(())
    }
}

/// serializable dump of a memory store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub customers: Vec<Customer>,
    pub loans: Vec<Loan>,
    pub installments: Vec<Installment>,
}
