use atm::ids::AccountId;
use atm::{Money, Result, SeedAccount};

use std::{
    path::PathBuf,
    fs::File,
};

use csv::{Reader, ReaderBuilder, Trim};

use serde::Deserialize;

use thiserror::Error;

/// Represents one row of the seed accounts file: `account,pin,balance`
#[derive(Deserialize, Debug, Clone)]
pub struct SeedRecord {
    pub account: String,
    pub pin: String,
    pub balance: String,
}

#[derive(Error, Debug)]
pub enum SeedParseError {
    #[error("Error parsing seed record: negative opening balance: {0:?}")]
    NegativeBalance(SeedRecord),
}

pub fn build_csv_reader(filepath: PathBuf) -> Result<Reader<File>> {
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(filepath)?;

    return Ok(reader);
}

/// Reads and validates every seed record. Seeding fails fast on a malformed
/// row rather than starting the ATM with a partial registry.
pub fn read_seed_accounts(filepath: PathBuf) -> Result<Vec<SeedAccount>> {
    let mut rdr = build_csv_reader(filepath)?;

    let mut seeds = vec![];

    for record in rdr.deserialize::<SeedRecord>() {
        let record = record?;
        log::debug!("Parsing seed record: {record:?}");

        let balance = Money::parse(record.balance.clone())?;

        if balance < Money::ZERO {
            Err(SeedParseError::NegativeBalance(record.clone()))?;
        }

        seeds.push(SeedAccount::new(
            AccountId::new(record.account),
            record.pin,
            balance,
        ));
    }

    Ok(seeds)
}
