/// quick start - originate a loan and make one payment
use loan_ledger_rs::{
    Caller, Customer, CustomerStore, LoanLedger, MemoryStore, Money, Rate, SafeTimeProvider,
    TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // seed a customer with a $10,000 limit
    let store = MemoryStore::new();
    let customer = store.save_customer(Customer::new("John", "Doe", Money::from_major(10_000)))?;

    let ledger = LoanLedger::new(store);
    let time = SafeTimeProvider::new(TimeSource::System);
    let admin = Caller::admin(Uuid::new_v4());

    // $1,000 at 20% over 12 installments
    let loan = ledger.create_loan(
        &admin,
        customer.id,
        Money::from_major(1_000),
        Rate::from_percentage(20),
        12,
        &time,
    )?;
    println!("{}", loan.to_json_pretty()?);

    // pay the first installment
    let result = ledger.pay_installments(&admin, loan.id, Money::from_major(150), &time)?;
    println!(
        "paid {} installment(s), spent ${}",
        result.installments_paid, result.total_amount_spent
    );

    Ok(())
}
