use crate::money::MoneyError;
use crate::Money;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error("Exceeded daily withdrawal limit: requested {requested}, remaining allowance {remaining}")]
    DailyLimitExceeded { requested: Money, remaining: Money },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A single account's ledger: balance, append-only transaction history, and
/// the cumulative withdrawal accumulator for the daily cap.
///
/// The accumulator is never reset during a run, so the "daily" limit is
/// effectively a per-session cap.
#[derive(Debug, Clone)]
pub struct BankAccount {
    balance: Money,
    history: Vec<String>,
    daily_withdrawn: Money,
}

impl BankAccount {
    /// Maximum cumulative withdrawal amount per account, 1000.00 currency units.
    pub const DAILY_LIMIT: Money = Money(10_000_000);

    pub fn new(initial_balance: Money) -> Self {
        Self {
            balance: initial_balance,
            history: vec![],
            daily_withdrawn: Money::ZERO,
        }
    }

    pub fn deposit(&mut self, amount: Money) -> Result<(), AccountError> {
        if !amount.is_positive() {
            return Err(AccountError::InvalidAmount(amount));
        }

        self.balance.add(&amount)?;
        self.history.push(format!("Deposited: ${amount}"));

        log::debug!("Deposited {amount}, balance is now {}", self.balance);

        Ok(())
    }

    /// Validates a withdrawal against the current ledger state without
    /// mutating anything. Shared with the transfer path so transfers fail
    /// through the same precedence as direct withdrawals.
    pub fn check_withdrawal(&self, amount: Money) -> Result<(), AccountError> {
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        let mut projected = self.daily_withdrawn;
        projected.add(&amount)?;

        if projected > Self::DAILY_LIMIT {
            let mut remaining = Self::DAILY_LIMIT;
            remaining.sub(&self.daily_withdrawn)?;

            return Err(AccountError::DailyLimitExceeded {
                requested: amount,
                remaining,
            });
        }

        if !amount.is_positive() {
            return Err(AccountError::InvalidAmount(amount));
        }

        Ok(())
    }

    pub fn withdraw(&mut self, amount: Money) -> Result<(), AccountError> {
        self.check_withdrawal(amount)?;

        self.balance.sub(&amount)?;
        self.daily_withdrawn.add(&amount)?;
        self.history.push(format!("Withdrew: ${amount}"));

        log::debug!("Withdrew {amount}, balance is now {}", self.balance);

        Ok(())
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Chronological transaction log, oldest first. Read-only view.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn daily_withdrawn(&self) -> Money {
        self.daily_withdrawn
    }

    /// Balance expressed in another currency at the given rate. Display
    /// helper only; the stored balance is unchanged.
    pub fn convert_to_currency(&self, rate: f64) -> Money {
        self.balance.convert(rate)
    }
}
