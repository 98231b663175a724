use hourglass_rs::SafeTimeProvider;
use parking_lot::Mutex;
use tracing::info;

use crate::config::LedgerConfig;
use crate::customer::Customer;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::identity::Caller;
use crate::loan::{Installment, Loan};
use crate::locks::LockRegistry;
use crate::origination::{AdmissionControl, LoanApplication};
use crate::payments::{PaymentAllocator, PaymentRequest, PaymentResult, PricingEngine};
use crate::schedule::{add_months, InstallmentSchedule};
use crate::store::{CustomerStore, InstallmentStore, LedgerStore, LoanStore, StoreTransaction};
use crate::types::{CustomerId, LoanFilter, LoanId};
use crate::views::{CustomerView, LoanView};

/// loan ledger engine
///
/// Every operation takes the verified caller explicitly and checks that it
/// is an admin or the owning customer. Writes of one operation are staged
/// in a store transaction and committed together.
pub struct LoanLedger<S: LedgerStore> {
    store: S,
    config: LedgerConfig,
    locks: LockRegistry,
    events: Mutex<EventStore>,
}

impl<S: LedgerStore> LoanLedger<S> {
    /// create ledger with the standard policy
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: LedgerConfig::standard(),
            locks: LockRegistry::new(),
            events: Mutex::new(EventStore::new()),
        }
    }

    /// create ledger with a custom policy
    pub fn with_config(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            locks: LockRegistry::new(),
            events: Mutex::new(EventStore::new()),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// register a customer with an initial credit limit (admin only)
    pub fn register_customer(
        &self,
        caller: &Caller,
        name: &str,
        surname: &str,
        credit_limit: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<CustomerView> {
        caller.require_admin()?;
        if credit_limit.is_negative() {
            return Err(LedgerError::invalid_argument(format!(
                "credit limit cannot be negative: {}",
                credit_limit
            )));
        }

        let customer = Customer::new(name, surname, credit_limit);
        let mut tx = StoreTransaction::begin(&self.store);
        tx.save_customer(customer.clone());
        tx.commit()?;

        info!(customer_id = %customer.id, credit_limit = %credit_limit, "customer registered");
        self.events.lock().emit(LedgerEvent::CustomerRegistered {
            customer_id: customer.id,
            credit_limit,
            timestamp: time_provider.now(),
        });

        Ok(CustomerView::from_customer(&customer))
    }

    /// originate a loan and its installment schedule
    pub fn create_loan(
        &self,
        caller: &Caller,
        customer_id: CustomerId,
        principal: Money,
        interest_rate: Rate,
        number_of_installments: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanView> {
        caller.authorize(customer_id)?;

        let application =
            LoanApplication::new(customer_id, principal, interest_rate, number_of_installments);
        self.locks.with_customer(customer_id, || self.originate(&application, time_provider))
    }

    // runs under the customer lock
    fn originate(
        &self,
        application: &LoanApplication,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanView> {
        let LoanApplication {
            customer_id,
            principal,
            interest_rate,
            number_of_installments,
        } = *application;

        let mut tx = StoreTransaction::begin(&self.store);
        let mut customer = tx.get_customer(customer_id)?;
        let total = AdmissionControl::new(&self.config).assess(&customer, application)?;

        let now = time_provider.now();
        let loan = Loan::new(
            customer_id,
            principal,
            interest_rate,
            number_of_installments,
            now.date_naive(),
        );
        let schedule = InstallmentSchedule::generate(&loan)?;
        customer.reserve_credit(total)?;

        let used_credit_limit = customer.used_credit_limit;
        tx.save_customer(customer);
        tx.save_loan(loan.clone());
        tx.save_installments(schedule.installments.iter().cloned());
        tx.commit()?;

        info!(
            loan_id = %loan.id,
            customer_id = %customer_id,
            loan_amount = %loan.loan_amount,
            installments = number_of_installments,
            "loan originated"
        );

        let mut pending = EventStore::new();
        pending.emit(LedgerEvent::LoanOriginated {
            loan_id: loan.id,
            customer_id,
            principal,
            interest_rate,
            loan_amount: loan.loan_amount,
            number_of_installments,
            first_due_date: schedule.first_due_date().unwrap_or(loan.create_date),
            timestamp: now,
        });
        pending.emit(LedgerEvent::CreditLimitReserved {
            customer_id,
            amount: total,
            used_credit_limit,
            timestamp: now,
        });
        self.events.lock().append(&mut pending);

        Ok(LoanView::new(&loan, schedule.installments))
    }

    /// loans of a customer, optionally filtered
    pub fn list_loans(
        &self,
        caller: &Caller,
        customer_id: CustomerId,
        filter: &LoanFilter,
    ) -> Result<Vec<Loan>> {
        caller.authorize(customer_id)?;
        self.store.find_loans_by_customer(customer_id, filter)
    }

    /// installments of a loan in schedule order
    pub fn list_installments(&self, caller: &Caller, loan_id: LoanId) -> Result<Vec<Installment>> {
        let loan = self.store.get_loan(loan_id)?;
        caller.authorize(loan.customer_id)?;
        self.store.find_by_loan(loan_id)
    }

    pub fn get_loan(&self, caller: &Caller, loan_id: LoanId) -> Result<Loan> {
        let loan = self.store.get_loan(loan_id)?;
        caller.authorize(loan.customer_id)?;
        Ok(loan)
    }

    /// loan with its installments
    pub fn get_loan_view(&self, caller: &Caller, loan_id: LoanId) -> Result<LoanView> {
        let loan = self.get_loan(caller, loan_id)?;
        let installments = self.store.find_by_loan(loan_id)?;
        Ok(LoanView::new(&loan, installments))
    }

    pub fn get_customer(&self, caller: &Caller, customer_id: CustomerId) -> Result<CustomerView> {
        caller.authorize(customer_id)?;
        let customer = self.store.get_customer(customer_id)?;
        Ok(CustomerView::from_customer(&customer))
    }

    /// pay installments of a loan falling due within the payment window
    ///
    /// Installments are settled whole, earliest due first, until the next
    /// one costs more than what is left. The customer's used credit drops
    /// by the nominal amounts settled. Discounts and penalties are priced
    /// and reported on the result but not charged.
    pub fn pay_installments(
        &self,
        caller: &Caller,
        loan_id: LoanId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentResult> {
        let owner = self.store.get_loan(loan_id)?.customer_id;
        caller.authorize(owner)?;
        let request = PaymentRequest::new(loan_id, amount);
        request.validate()?;

        self.locks.with_loan(loan_id, || {
            self.locks.with_customer(owner, || self.apply_payment(&request, time_provider))
        })
    }

    // runs under the loan lock, then the customer lock
    fn apply_payment(
        &self,
        request: &PaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentResult> {
        let PaymentRequest { loan_id, amount } = *request;

        let mut tx = StoreTransaction::begin(&self.store);
        let mut loan = tx.get_loan(loan_id)?;

        let now = time_provider.now();
        let today = now.date_naive();
        let window_end = add_months(today, self.config.repayment.payment_window_months)?;

        let candidates = tx.find_unpaid_due_between(loan_id, today, window_end)?;
        let pricing = PricingEngine::from_config(&self.config.repayment);
        let allocator = PaymentAllocator::new(pricing);
        let allocation = allocator.allocate(amount, candidates, today);

        tx.save_installments(allocation.paid.iter().cloned());

        let mut pending = EventStore::new();
        for (installment, pricing) in allocation.paid.iter().zip(&allocation.pricing) {
            pending.emit(LedgerEvent::InstallmentPaid {
                loan_id,
                installment_id: installment.id,
                due_date: installment.due_date,
                nominal_amount: pricing.nominal_amount,
                effective_amount: pricing.effective_amount,
                days_before_due: pricing.days_before_due,
                payment_date: today,
            });
        }

        // settled only when nothing is left unpaid, in or out of the window
        let loan_fully_paid = tx.find_unpaid(loan_id)?.is_empty();
        if loan_fully_paid {
            if loan.mark_paid() {
                info!(loan_id = %loan_id, customer_id = %loan.customer_id, "loan settled");
                pending.emit(LedgerEvent::LoanSettled {
                    loan_id,
                    customer_id: loan.customer_id,
                    timestamp: now,
                });
            }
            tx.save_loan(loan.clone());
        }

        let mut customer = tx.get_customer(loan.customer_id)?;
        customer.release_credit(allocation.total_amount_spent);
        let used_credit_limit = customer.used_credit_limit;
        tx.save_customer(customer);

        tx.commit()?;

        info!(
            loan_id = %loan_id,
            installments_paid = allocation.paid.len(),
            amount_spent = %allocation.total_amount_spent,
            loan_fully_paid,
            "payment processed"
        );

        pending.emit(LedgerEvent::PaymentReceived {
            loan_id,
            amount,
            installments_paid: allocation.installments_paid(),
            amount_applied: allocation.total_amount_spent,
            timestamp: now,
        });
        if !allocation.total_amount_spent.is_zero() {
            pending.emit(LedgerEvent::CreditLimitReleased {
                customer_id: loan.customer_id,
                amount: allocation.total_amount_spent,
                used_credit_limit,
                timestamp: now,
            });
        }
        self.events.lock().append(&mut pending);

        Ok(PaymentResult::from_allocation(loan_id, allocation, loan_fully_paid, today))
    }

    /// copy of the recorded events
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().events().to_vec()
    }

    /// drain the recorded events
    pub fn take_events(&self) -> Vec<LedgerEvent> {
        self.events.lock().take_events()
    }
}
