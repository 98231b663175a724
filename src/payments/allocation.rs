use chrono::NaiveDate;
use tracing::debug;

use crate::decimal::Money;
use crate::loan::Installment;

use super::pricing::{InstallmentPricing, PricingEngine};

/// outcome of spreading one payment over candidate installments
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// installments settled by this payment, earliest due first
    pub paid: Vec<Installment>,
    pub pricing: Vec<InstallmentPricing>,
    /// sum of nominal amounts settled
    pub total_amount_spent: Money,
    /// part of the payment not applied to any installment
    pub unapplied: Money,
}

impl Allocation {
    pub fn installments_paid(&self) -> u32 {
        self.paid.len() as u32
    }
}

/// greedy earliest-due-first allocator
///
/// Installments are settled in full at their nominal amount, in due date
/// order, until the next one costs more than what is left. Nothing is ever
/// applied partially. Pricing is computed for each settled installment but
/// the nominal amount is what leaves the payment.
pub struct PaymentAllocator {
    pricing: PricingEngine,
}

impl PaymentAllocator {
    pub fn new(pricing: PricingEngine) -> Self {
        Self { pricing }
    }

    pub fn allocate(
        &self,
        amount: Money,
        mut candidates: Vec<Installment>,
        payment_date: NaiveDate,
    ) -> Allocation {
        // stable: equal due dates keep store order
        candidates.sort_by_key(|installment| installment.due_date);

        let mut remaining = amount;
        let mut paid = Vec::new();
        let mut pricing = Vec::new();
        let mut total_amount_spent = Money::ZERO;

        for mut installment in candidates {
            if remaining < installment.amount {
                break;
            }

            let priced = self.pricing.price(&installment, payment_date);
            debug!(
                installment_id = %installment.id,
                due_date = %installment.due_date,
                nominal = %priced.nominal_amount,
                effective = %priced.effective_amount,
                "installment settled"
            );

            installment.pay(payment_date);
            remaining -= installment.amount;
            total_amount_spent += installment.amount;

            pricing.push(priced);
            paid.push(installment);
        }

        Allocation {
            paid,
            pricing,
            total_amount_spent,
            unapplied: remaining,
        }
    }
}
