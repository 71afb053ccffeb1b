//! This library is there to share some common code amongst all tabfetch modules.
//!
//! - `ConfigFile` finds and loads the HCL configuration file,
//! - `init_logging()` sets up the per-run logging (stderr + log file),
//! - `Workdir` manages the working folders and the archiving of a previous run.
//!

use clap::{crate_name, crate_version};

pub use config::*;
pub use logging::*;
pub use workdir::*;

mod config;
mod logging;
mod workdir;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

/// Every configuration file carries a `version` number so we can detect stale files.
///
pub trait Versioned {
    fn version(&self) -> usize;
}

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
