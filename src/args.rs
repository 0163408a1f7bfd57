use atm::Result;

use std::{
    env,
    fs,
    path::PathBuf,
};

use anyhow::Context;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputArgsError {
    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Parses the input arguments. An optional first argument names a CSV file of
/// seed accounts; without it the built-in demo accounts are used.
pub fn parse_seed_file_arg() -> Result<Option<PathBuf>> {
    let filename = match env::args().nth(1) {
        Some(filename) => filename,
        None => return Ok(None),
    };

    let path = fs::canonicalize(filename.clone())
        .with_context(|| InputArgsError::FileNotFound(filename))?;

    Ok(Some(path))
}
