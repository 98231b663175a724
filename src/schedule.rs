use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::loan::{Installment, Loan};
use crate::types::LoanId;

/// equal-share installment schedule for a loan
///
/// `installment_amount` is the regular share; the last installment may
/// differ from it by the rounding remainder.
#[derive(Debug, Clone)]
pub struct InstallmentSchedule {
    pub loan_id: LoanId,
    pub total_amount: Money,
    pub installment_amount: Money,
    pub installments: Vec<Installment>,
}

impl InstallmentSchedule {
    /// generate the schedule for a freshly created loan
    ///
    /// The total is divided evenly at money precision and the last
    /// installment takes the rounding remainder, so the amounts always sum
    /// to the loan amount. Due dates fall on the first day of each month,
    /// starting the month after creation.
    pub fn generate(loan: &Loan) -> Result<Self> {
        if loan.number_of_installments == 0 {
            return Err(LedgerError::invalid_argument(
                "a schedule needs at least one installment",
            ));
        }

        let count = loan.number_of_installments;
        let installment_amount = loan.loan_amount.split_even(count);
        let final_amount = loan.loan_amount - installment_amount * Decimal::from(count - 1);
        let first_due = first_due_date(loan.create_date)?;

        let installments = (0..count)
            .map(|i| {
                let due_date = add_months(first_due, i)?;
                let amount = if i + 1 == count {
                    final_amount
                } else {
                    installment_amount
                };
                Ok(Installment::new(loan.id, amount, due_date))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            loan_id: loan.id,
            total_amount: loan.loan_amount,
            installment_amount,
            installments,
        })
    }

    /// sum of scheduled installment amounts
    pub fn total_scheduled(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    pub fn first_due_date(&self) -> Option<NaiveDate> {
        self.installments.first().map(|i| i.due_date)
    }

    pub fn last_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.due_date)
    }
}

/// first calendar day of the month after `create_date`
pub fn first_due_date(create_date: NaiveDate) -> Result<NaiveDate> {
    add_months(create_date, 1)?
        .with_day(1)
        .ok_or_else(|| LedgerError::InvalidDate {
            message: format!("no first day of month after {}", create_date),
        })
}

/// calendar month arithmetic, clamping to month end
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LedgerError::InvalidDate {
            message: format!("{} plus {} months is out of range", date, months),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(principal: i64, rate: rust_decimal::Decimal, count: u32, created: NaiveDate) -> Loan {
        Loan::new(
            Uuid::new_v4(),
            Money::from_major(principal),
            Rate::from_decimal(rate),
            count,
            created,
        )
    }

    #[test]
    fn test_twelve_equal_installments() {
        let loan = loan(1_000, dec!(0.2), 12, date(2024, 1, 15));
        let schedule = InstallmentSchedule::generate(&loan).unwrap();

        assert_eq!(schedule.installments.len(), 12);
        assert!(schedule
            .installments
            .iter()
            .all(|i| i.amount == Money::from_major(100) && !i.is_paid && i.loan_id == loan.id));
        assert_eq!(schedule.total_scheduled(), Money::from_major(1_200));
    }

    #[test]
    fn test_due_dates_are_first_of_consecutive_months() {
        let loan = loan(1_000, dec!(0.2), 12, date(2024, 11, 20));
        let schedule = InstallmentSchedule::generate(&loan).unwrap();

        assert_eq!(schedule.first_due_date(), Some(date(2024, 12, 1)));
        assert_eq!(schedule.installments[1].due_date, date(2025, 1, 1));
        assert_eq!(schedule.last_due_date(), Some(date(2025, 11, 1)));
    }

    #[test]
    fn test_month_end_creation() {
        // january 31st rolls into february, not march
        assert_eq!(first_due_date(date(2024, 1, 31)).unwrap(), date(2024, 2, 1));
        assert_eq!(first_due_date(date(2024, 12, 31)).unwrap(), date(2025, 1, 1));
    }

    #[test]
    fn test_inexact_division_sums_to_loan_amount() {
        for count in [6_u32, 9, 12, 24] {
            let loan = loan(1_000, dec!(0.15), count, date(2024, 3, 10));
            let schedule = InstallmentSchedule::generate(&loan).unwrap();

            assert_eq!(schedule.installments.len(), count as usize);
            assert_eq!(schedule.total_scheduled(), loan.loan_amount);
        }
    }

    #[test]
    fn test_last_installment_takes_remainder() {
        // 1150 / 9 = 127.777..., eight shares of 127.77777778 leave 127.77777776
        let loan = loan(1_000, dec!(0.15), 9, date(2024, 1, 15));
        let schedule = InstallmentSchedule::generate(&loan).unwrap();

        let share = Money::from_decimal(dec!(127.77777778));
        assert_eq!(schedule.installment_amount, share);
        assert!(schedule.installments[..8].iter().all(|i| i.amount == share));
        assert_eq!(schedule.installments[8].amount, Money::from_decimal(dec!(127.77777776)));
    }

    #[test]
    fn test_single_installment_is_whole_amount() {
        let loan = loan(1_000, dec!(0.15), 1, date(2024, 1, 15));
        let schedule = InstallmentSchedule::generate(&loan).unwrap();
        assert_eq!(schedule.installments[0].amount, Money::from_major(1_150));
    }

    #[test]
    fn test_zero_installments_rejected() {
        let loan = loan(1_000, dec!(0.2), 0, date(2024, 1, 15));
        assert!(InstallmentSchedule::generate(&loan).is_err());
    }
}
