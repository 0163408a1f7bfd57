use crate::ids::AccountId;
use crate::machine::{Atm, AtmError};
use crate::{BankAccount, Money};

/// A menu action, already parsed and validated by the caller. Each variant
/// maps 1:1 to a core operation.
#[derive(Debug, Clone)]
pub enum Command {
    CheckBalance,
    Deposit(Money),
    Withdraw(Money),
    ShowHistory,
    ConvertBalance(f64),
    ChangePin { old_pin: String, new_pin: String },
    Transfer { target: AccountId, amount: Money },
}

/// Structured outcome of a dispatched command, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Balance(Money),
    DepositMade { balance: Money },
    WithdrawalMade { balance: Money },
    History(Vec<String>),
    ConvertedBalance(Money),
    PinChanged,
    TransferComplete { target: AccountId, amount: Money },
}

/// An authenticated session bound to one account. Commands are dispatched to
/// the core with no I/O of any kind; rendering is the caller's job.
#[derive(Debug)]
pub struct Session<'a> {
    atm: &'a mut Atm,
    account_id: AccountId,
}

impl<'a> Session<'a> {
    /// Authenticates against the ATM and opens a session on success.
    pub fn open(atm: &'a mut Atm, account_id: AccountId, pin: &str) -> Result<Self, AtmError> {
        if atm.select_account(&account_id).is_none() {
            return Err(AtmError::UnknownAccount(account_id));
        }

        atm.verify_pin(&account_id, pin)?;

        log::debug!("Session opened for account {account_id}");

        Ok(Self { atm, account_id })
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Reply, AtmError> {
        log::debug!("Dispatching command: {command:?}");

        match command {
            Command::CheckBalance => Ok(Reply::Balance(self.account()?.balance())),

            Command::Deposit(amount) => {
                let account = self.account_mut()?;
                account.deposit(amount)?;

                Ok(Reply::DepositMade {
                    balance: account.balance(),
                })
            }

            Command::Withdraw(amount) => {
                let account = self.account_mut()?;
                account.withdraw(amount)?;

                Ok(Reply::WithdrawalMade {
                    balance: account.balance(),
                })
            }

            Command::ShowHistory => Ok(Reply::History(self.account()?.history().to_vec())),

            Command::ConvertBalance(rate) => Ok(Reply::ConvertedBalance(
                self.account()?.convert_to_currency(rate),
            )),

            Command::ChangePin { old_pin, new_pin } => {
                self.atm.change_pin(&self.account_id, &old_pin, &new_pin)?;

                Ok(Reply::PinChanged)
            }

            Command::Transfer { target, amount } => {
                self.atm.transfer_funds(&self.account_id, &target, amount)?;

                Ok(Reply::TransferComplete { target, amount })
            }
        }
    }

    fn account(&self) -> Result<&BankAccount, AtmError> {
        self.atm
            .select_account(&self.account_id)
            .ok_or_else(|| AtmError::UnknownAccount(self.account_id.clone()))
    }

    fn account_mut(&mut self) -> Result<&mut BankAccount, AtmError> {
        self.atm
            .account_mut(&self.account_id)
            .ok_or_else(|| AtmError::UnknownAccount(self.account_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::SeedAccount;

    const SOME_PIN: &str = "1234";

    fn build_atm() -> Atm {
        Atm::with_accounts([
            SeedAccount::new("123", SOME_PIN, Money(5_000_000)),
            SeedAccount::new("456", "4567", Money(10_000_000)),
        ])
    }

    #[test]
    fn open_requires_a_registered_account() {
        let mut atm = build_atm();

        let err = Session::open(&mut atm, AccountId::from("999"), SOME_PIN).unwrap_err();

        assert!(matches!(err, AtmError::UnknownAccount(_)));
    }

    #[test]
    fn open_requires_the_correct_pin() {
        let mut atm = build_atm();

        let err = Session::open(&mut atm, AccountId::from("123"), "0000").unwrap_err();

        assert!(matches!(err, AtmError::IncorrectPin { remaining: 2 }));
    }

    #[test]
    fn dispatch_deposit_then_balance() {
        let mut atm = build_atm();
        let mut session = Session::open(&mut atm, AccountId::from("123"), SOME_PIN).unwrap();

        let reply = session.dispatch(Command::Deposit(Money(1_000_000))).unwrap();
        assert_eq!(
            reply,
            Reply::DepositMade {
                balance: Money(6_000_000)
            }
        );

        let reply = session.dispatch(Command::CheckBalance).unwrap();
        assert_eq!(reply, Reply::Balance(Money(6_000_000)));
    }

    #[test]
    fn dispatch_withdraw_failure_propagates_the_ledger_error() {
        let mut atm = build_atm();
        let mut session = Session::open(&mut atm, AccountId::from("123"), SOME_PIN).unwrap();

        let err = session
            .dispatch(Command::Withdraw(Money(6_000_000)))
            .unwrap_err();

        assert!(matches!(err, AtmError::Account(_)));
    }

    #[test]
    fn dispatch_history_returns_a_snapshot() {
        let mut atm = build_atm();
        let mut session = Session::open(&mut atm, AccountId::from("123"), SOME_PIN).unwrap();

        session.dispatch(Command::Deposit(Money(1_000_000))).unwrap();

        let reply = session.dispatch(Command::ShowHistory).unwrap();
        assert_eq!(
            reply,
            Reply::History(vec!["Deposited: $100.00".to_string()])
        );
    }

    #[test]
    fn dispatch_convert_balance() {
        let mut atm = build_atm();
        let mut session = Session::open(&mut atm, AccountId::from("123"), SOME_PIN).unwrap();

        let reply = session.dispatch(Command::ConvertBalance(0.9)).unwrap();
        assert_eq!(reply, Reply::ConvertedBalance(Money(4_500_000)));
    }

    #[test]
    fn dispatch_change_pin_and_transfer() {
        let mut atm = build_atm();
        let mut session = Session::open(&mut atm, AccountId::from("123"), SOME_PIN).unwrap();

        let reply = session
            .dispatch(Command::ChangePin {
                old_pin: SOME_PIN.to_string(),
                new_pin: "9999".to_string(),
            })
            .unwrap();
        assert_eq!(reply, Reply::PinChanged);

        let reply = session
            .dispatch(Command::Transfer {
                target: AccountId::from("456"),
                amount: Money(3_000_000),
            })
            .unwrap();
        assert_eq!(
            reply,
            Reply::TransferComplete {
                target: AccountId::from("456"),
                amount: Money(3_000_000)
            }
        );

        assert_eq!(
            atm.select_account(&AccountId::from("123")).unwrap().balance(),
            Money(2_000_000)
        );
    }
}
