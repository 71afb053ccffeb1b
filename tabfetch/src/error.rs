//! Error module
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Status {
    #[error("Bad file version {0}")]
    BadFileVersion(usize),
    #[error("Missing configuration file, use -c or create {0}")]
    MissingConfig(String),
    #[error("No input file, use -i or set `input` in the configuration")]
    MissingInput,
    #[error("Input file has no {0} column")]
    MissingColumn(String),
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}
