pub mod config;
pub mod customer;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod identity;
pub mod ledger;
pub mod loan;
pub mod locks;
pub mod origination;
pub mod payments;
pub mod schedule;
pub mod store;
pub mod types;
pub mod views;

// re-export key types
pub use config::{LedgerConfig, OriginationConfig, RepaymentConfig};
pub use customer::Customer;
pub use decimal::{Money, Rate};
pub use errors::{ErrorKind, LedgerError, Result};
pub use events::{EventStore, LedgerEvent};
pub use identity::Caller;
pub use ledger::LoanLedger;
pub use loan::{Installment, Loan};
pub use origination::{AdmissionControl, LoanApplication};
pub use payments::{
    Allocation, InstallmentPricing, PaymentAllocator, PaymentRequest, PaymentResult, PricingEngine,
};
pub use schedule::InstallmentSchedule;
pub use store::{
    ChangeSet, CustomerStore, InstallmentStore, LedgerStore, LoanStore, MemoryStore, StoreSnapshot,
    StoreTransaction,
};
pub use types::{CustomerId, EntityKind, InstallmentId, LoanFilter, LoanId, Role};
pub use views::{CustomerView, LoanView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
