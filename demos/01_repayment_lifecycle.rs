/// repayment lifecycle - pay a loan off under controlled time
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    Caller, LedgerEvent, LoanFilter, LoanLedger, MemoryStore, Money, Rate, SafeTimeProvider,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    println!("=== repayment lifecycle example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let ledger = LoanLedger::new(MemoryStore::new());
    let admin = Caller::admin(Uuid::new_v4());

    let limit = Money::from_major(5_000);
    let customer = ledger.register_customer(&admin, "Jane", "Roe", limit, &time)?;
    println!(
        "registered {} {} (limit ${})",
        customer.name, customer.surname, customer.credit_limit
    );

    // the customer borrows on their own behalf
    let owner = Caller::customer(customer.id);
    let loan = ledger.create_loan(
        &owner,
        customer.id,
        Money::from_major(1_000),
        Rate::from_percentage(20),
        6,
        &time,
    )?;
    println!("loan of ${} in {} installments", loan.loan_amount, loan.number_of_installments);
    for installment in &loan.installments {
        println!("  due {}: ${}", installment.due_date, installment.amount);
    }

    // pay everything currently in the window
    let first = ledger.pay_installments(&owner, loan.id, Money::from_major(5_000), &time)?;
    println!(
        "\n{}: paid {} installment(s), ${} spent, ${} unapplied",
        time.now().format("%Y-%m-%d"),
        first.installments_paid,
        first.total_amount_spent,
        first.unapplied_amount
    );
    for pricing in &first.pricing {
        println!(
            "  {} paid {} days early: nominal ${}, effective ${}",
            pricing.due_date,
            pricing.days_before_due,
            pricing.nominal_amount,
            pricing.effective_amount
        );
    }

    // three months later the remaining installments come into the window
    controller.advance(Duration::days(96));
    let second = ledger.pay_installments(&owner, loan.id, Money::from_major(5_000), &time)?;
    println!(
        "\n{}: paid {} installment(s), loan fully paid: {}",
        time.now().format("%Y-%m-%d"),
        second.installments_paid,
        second.loan_fully_paid
    );

    let open = ledger.list_loans(&owner, customer.id, &LoanFilter::all().with_paid(false))?;
    println!("open loans: {}", open.len());

    let position = ledger.get_customer(&owner, customer.id)?;
    println!("\ncustomer position:\n{}", position.to_json_pretty()?);

    let settled = ledger
        .events()
        .iter()
        .filter(|e| matches!(e, LedgerEvent::LoanSettled { .. }))
        .count();
    println!("\n{} events recorded, {} settlement(s)", ledger.events().len(), settled);

    Ok(())
}
