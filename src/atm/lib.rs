pub mod ids;
pub mod session;

mod account;
mod machine;
mod money;
mod result;

pub use account::{AccountError, BankAccount};
pub use machine::{Atm, AtmError, SeedAccount, MAX_PIN_ATTEMPTS};
pub use money::{Money, MoneyError};
pub use result::Result;

/// Builds an ATM seeded with the two demo accounts.
pub fn build_atm() -> Atm {
    let atm = Atm::with_accounts([
        SeedAccount::new("123", "1234", Money(5_000_000)),
        SeedAccount::new("456", "4567", Money(10_000_000)),
    ]);

    return atm;
}
