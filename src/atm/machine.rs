use crate::account::AccountError;
use crate::ids::AccountId;
use crate::{BankAccount, Money};

use std::collections::HashMap;

use thiserror::Error;

/// Consecutive PIN failures that lock an account for the rest of the run.
pub const MAX_PIN_ATTEMPTS: u8 = 3;

#[derive(Error, Debug)]
pub enum AtmError {
    #[error("Incorrect PIN. You have {remaining} chance(s) left")]
    IncorrectPin { remaining: u8 },

    #[error("Account is locked due to multiple failed attempts")]
    AccountLocked,

    #[error("Account not found: {0}")]
    UnknownAccount(AccountId),

    #[error("Cannot transfer funds into your own account")]
    SelfTransfer,

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Per-account authentication state. Locking is a one-way transition with no
/// unlock path; it lasts for the process lifetime.
#[derive(Debug, Clone, Default)]
struct AuthState {
    failed_attempts: u8,
    locked: bool,
}

/// One account's seed record: id, PIN, and opening balance arrive together,
/// so an account without a PIN is unrepresentable.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub id: AccountId,
    pub pin: String,
    pub balance: Money,
}

impl SeedAccount {
    pub fn new(id: impl Into<AccountId>, pin: impl Into<String>, balance: Money) -> Self {
        return Self {
            id: id.into(),
            pin: pin.into(),
            balance,
        };
    }
}

#[derive(Debug)]
pub struct Atm {
    accounts: HashMap<AccountId, BankAccount>,
    pins: HashMap<AccountId, String>,
    auth: HashMap<AccountId, AuthState>,
}

impl Atm {
    pub fn with_accounts(seeds: impl IntoIterator<Item = SeedAccount>) -> Self {
        let mut accounts = HashMap::new();
        let mut pins = HashMap::new();

        for seed in seeds {
            accounts.insert(seed.id.clone(), BankAccount::new(seed.balance));
            pins.insert(seed.id, seed.pin);
        }

        return Self {
            accounts,
            pins,
            auth: HashMap::new(),
        };
    }

    /// Checks `input_pin` against the stored PIN for `account_id`.
    ///
    /// Three consecutive failures lock the account permanently; a successful
    /// verification resets the failure counter. Unknown account ids count as
    /// failures too, so probing ids cannot distinguish a wrong PIN from a
    /// missing account.
    pub fn verify_pin(&mut self, account_id: &AccountId, input_pin: &str) -> Result<(), AtmError> {
        let auth = self.auth.entry(account_id.clone()).or_default();

        if auth.locked {
            return Err(AtmError::AccountLocked);
        }

        if self.pins.get(account_id).map(String::as_str) == Some(input_pin) {
            auth.failed_attempts = 0;
            log::debug!("PIN verified for account {account_id}");
            return Ok(());
        }

        auth.failed_attempts += 1;
        log::debug!(
            "PIN verification failed for account {account_id}, attempt {}",
            auth.failed_attempts
        );

        if auth.failed_attempts >= MAX_PIN_ATTEMPTS {
            auth.locked = true;
            log::warn!("Account {account_id} locked after {MAX_PIN_ATTEMPTS} failed attempts");
            return Err(AtmError::AccountLocked);
        }

        return Err(AtmError::IncorrectPin {
            remaining: MAX_PIN_ATTEMPTS - auth.failed_attempts,
        });
    }

    /// Looks up an account without authenticating.
    pub fn select_account(&self, account_id: &AccountId) -> Option<&BankAccount> {
        return self.accounts.get(account_id);
    }

    pub fn account_mut(&mut self, account_id: &AccountId) -> Option<&mut BankAccount> {
        return self.accounts.get_mut(account_id);
    }

    /// Replaces the stored PIN after re-verifying the old one. Verification
    /// failures count toward the lockout like any other attempt.
    pub fn change_pin(
        &mut self,
        account_id: &AccountId,
        old_pin: &str,
        new_pin: &str,
    ) -> Result<(), AtmError> {
        self.verify_pin(account_id, old_pin)?;

        self.pins.insert(account_id.clone(), new_pin.to_string());
        log::debug!("PIN changed for account {account_id}");

        return Ok(());
    }

    /// Moves `amount` from `source_id` to `target_id` as one logical unit.
    ///
    /// Both legs are validated against current state before either ledger is
    /// touched. The source leg is checked through the same path as a direct
    /// withdrawal, so a transfer that fits the balance but exceeds the
    /// remaining daily allowance fails with no partial debit.
    pub fn transfer_funds(
        &mut self,
        source_id: &AccountId,
        target_id: &AccountId,
        amount: Money,
    ) -> Result<(), AtmError> {
        if source_id == target_id {
            return Err(AtmError::SelfTransfer);
        }

        let source = self
            .accounts
            .get(source_id)
            .ok_or_else(|| AtmError::UnknownAccount(source_id.clone()))?;

        if !self.accounts.contains_key(target_id) {
            return Err(AtmError::UnknownAccount(target_id.clone()));
        }

        source.check_withdrawal(amount)?;

        // Both legs validated; neither mutation below can fail now. The
        // deposit only rejects non-positive amounts, which check_withdrawal
        // already excluded.
        self.accounts
            .get_mut(source_id)
            .ok_or_else(|| AtmError::UnknownAccount(source_id.clone()))?
            .withdraw(amount)?;
        self.accounts
            .get_mut(target_id)
            .ok_or_else(|| AtmError::UnknownAccount(target_id.clone()))?
            .deposit(amount)?;

        log::debug!("Transferred {amount} from account {source_id} to account {target_id}");

        return Ok(());
    }
}
