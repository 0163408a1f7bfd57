mod args;
mod config;
mod menu;
mod reader;

use atm::{Atm, Result};

fn main() -> Result {
    config::configure_app()?;

    log::debug!("Application configured. Beginning session...");

    let mut atm = seed_atm()?;

    menu::run(&mut atm)?;

    log::debug!("Application finished successfully!");

    Ok(())
}

/// Seeds the ATM from the optional CSV argument, or with the built-in demo
/// accounts when no file is given.
fn seed_atm() -> Result<Atm> {
    let atm = match args::parse_seed_file_arg()? {
        Some(path) => {
            log::debug!("Seeding accounts from file: {path:?}");

            let seeds = reader::read_seed_accounts(path)?;
            Atm::with_accounts(seeds)
        }
        None => atm::build_atm(),
    };

    Ok(atm)
}
