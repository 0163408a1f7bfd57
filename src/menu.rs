use atm::ids::AccountId;
use atm::session::{Command, Reply, Session};
use atm::{AccountError, Atm, AtmError, Money, Result};

use std::io::{self, Write};

/// Runs one interactive ATM session over stdin/stdout. Every decision is made
/// by the core; this loop only parses input and renders outcomes.
pub fn run(atm: &mut Atm) -> Result {
    let account_id = AccountId::new(prompt("Enter your account ID: ")?);

    if atm.select_account(&account_id).is_none() {
        println!("Invalid account ID.");
        return Ok(());
    }

    let pin = match authenticate(atm, &account_id)? {
        Some(pin) => pin,
        None => return Ok(()),
    };

    let mut session = match Session::open(atm, account_id, &pin) {
        Ok(session) => session,
        Err(err) => {
            render_error(&err);
            return Ok(());
        }
    };

    loop {
        print_menu();

        let choice = prompt("Choose an option: ")?;

        match choice.as_str() {
            "1" => render(session.dispatch(Command::CheckBalance)),
            "2" => {
                if let Some(amount) = prompt_amount("Enter amount to deposit: $")? {
                    render(session.dispatch(Command::Deposit(amount)));
                }
            }
            "3" => {
                if let Some(amount) = prompt_amount("Enter amount to withdraw: $")? {
                    render(session.dispatch(Command::Withdraw(amount)));
                }
            }
            "4" => render(session.dispatch(Command::ShowHistory)),
            "5" => {
                if let Some(rate) = prompt_rate("Enter the exchange rate: ")? {
                    render(session.dispatch(Command::ConvertBalance(rate)));
                }
            }
            "6" => {
                let old_pin = prompt("Enter your current PIN: ")?;
                let new_pin = prompt("Enter your new PIN: ")?;
                render(session.dispatch(Command::ChangePin { old_pin, new_pin }));
            }
            "7" => {
                let target = AccountId::new(prompt("Enter target account ID: ")?);
                if let Some(amount) = prompt_amount("Enter amount to transfer: $")? {
                    render(session.dispatch(Command::Transfer { target, amount }));
                }
            }
            "8" => {
                println!("Thank you for using the ATM. Goodbye!");
                break;
            }
            _ => println!("Invalid option. Please try again."),
        }
    }

    Ok(())
}

/// Prompts for the PIN until verification succeeds or the account locks.
/// Returns the verified PIN, or None once the account is locked.
fn authenticate(atm: &mut Atm, account_id: &AccountId) -> Result<Option<String>> {
    loop {
        let pin = prompt("Enter your PIN: ")?;

        match atm.verify_pin(account_id, &pin) {
            Ok(()) => return Ok(Some(pin)),
            Err(err @ AtmError::IncorrectPin { .. }) => render_error(&err),
            Err(err) => {
                render_error(&err);
                return Ok(None);
            }
        }
    }
}

fn print_menu() {
    println!();
    println!("ATM Menu:");
    println!("1. Check Balance");
    println!("2. Deposit");
    println!("3. Withdraw");
    println!("4. View Transaction History");
    println!("5. Convert Balance to Another Currency");
    println!("6. Change PIN");
    println!("7. Transfer Funds");
    println!("8. Exit");
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

fn prompt_amount(label: &str) -> Result<Option<Money>> {
    let input = prompt(label)?;

    match Money::parse(input) {
        Ok(amount) => Ok(Some(amount)),
        Err(err) => {
            log::warn!("{err}");
            println!("Invalid amount.");
            Ok(None)
        }
    }
}

fn prompt_rate(label: &str) -> Result<Option<f64>> {
    let input = prompt(label)?;

    match input.parse::<f64>() {
        Ok(rate) => Ok(Some(rate)),
        Err(err) => {
            log::warn!("{err}");
            println!("Invalid exchange rate.");
            Ok(None)
        }
    }
}

fn render(outcome: std::result::Result<Reply, AtmError>) {
    match outcome {
        Ok(reply) => render_reply(&reply),
        Err(err) => render_error(&err),
    }
}

fn render_reply(reply: &Reply) {
    match reply {
        Reply::Balance(balance) => println!("Your current balance is: ${balance}"),

        Reply::DepositMade { balance } => {
            println!("Deposit successful. Current balance: ${balance}")
        }

        Reply::WithdrawalMade { balance } => {
            println!("Withdrawal successful. Current balance: ${balance}")
        }

        Reply::History(entries) if entries.is_empty() => println!("No transactions found."),

        Reply::History(entries) => {
            println!("Transaction History:");
            for entry in entries {
                println!("{entry}");
            }
        }

        Reply::ConvertedBalance(converted) => {
            println!("Your balance in the selected currency: ${converted}")
        }

        Reply::PinChanged => println!("PIN successfully changed."),

        Reply::TransferComplete { target, amount } => {
            println!("Transfer successful. ${amount} transferred to account {target}")
        }
    }
}

fn render_error(err: &AtmError) {
    match err {
        AtmError::IncorrectPin { remaining } => {
            println!("Incorrect PIN. You have {remaining} chance(s) left.")
        }

        AtmError::AccountLocked => println!(
            "Account locked due to multiple failed attempts. Your account is temporarily blocked."
        ),

        AtmError::UnknownAccount(_) => println!("Invalid account ID(s) provided."),

        AtmError::SelfTransfer => println!("Cannot transfer funds into your own account."),

        AtmError::Account(AccountError::InvalidAmount(_)) => println!("Invalid amount."),

        AtmError::Account(AccountError::InsufficientFunds { .. }) => {
            println!("Insufficient balance.")
        }

        AtmError::Account(AccountError::DailyLimitExceeded { .. }) => {
            println!("Exceeded daily withdrawal limit.")
        }

        other => println!("{other}"),
    }
}
