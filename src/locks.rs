use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::types::{CustomerId, LoanId};

/// per-entity mutual exclusion for ledger writes
///
/// Lock order is loan before customer everywhere. Loan creation only takes
/// the customer lock; payments take the loan lock, then the customer lock.
/// An entry lives only while some operation holds or waits on it.
#[derive(Debug, Default)]
pub struct LockRegistry {
    customers: DashMap<CustomerId, Arc<Mutex<()>>>,
    loans: DashMap<LoanId, Arc<Mutex<()>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// run `f` while holding the lock on one customer's credit figures
    pub fn with_customer<T>(&self, id: CustomerId, f: impl FnOnce() -> T) -> T {
        hold(&self.customers, id, f)
    }

    /// run `f` while holding the lock on one loan and its installments
    pub fn with_loan<T>(&self, id: LoanId, f: impl FnOnce() -> T) -> T {
        hold(&self.loans, id, f)
    }

    pub fn tracked_entities(&self) -> usize {
        self.customers.len() + self.loans.len()
    }
}

fn hold<T>(locks: &DashMap<Uuid, Arc<Mutex<()>>>, id: Uuid, f: impl FnOnce() -> T) -> T {
    let lock = locks.entry(id).or_default().clone();
    let result = {
        let _guard = lock.lock();
        f()
    };
    drop(lock);

    // the map's own handle is the last one: nobody holds or waits on it
    locks.remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    result
}
