//! Library part of the `tabfetch` utility.
//!
//! `tabfetch` reads a spreadsheet listing Tableau workbooks and worksheets, then for every row
//! downloads what is asked for (workbook package, view data, image and PDF) from a Tableau
//! Server.  The result of each step is recorded next to the input columns into a report file.
//!
//! Server access itself is in the `tabfetch-sources` crate, configuration, logging and working
//! folders in `tabfetch-common`.
//!

use clap::{crate_name, crate_version};

/// Re-export
///
pub use batch::*;
pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use error::*;
pub use input::*;
pub use report::*;

mod batch;
mod cli;
mod cmds;
mod config;
mod error;
mod input;
mod report;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

/// Return our version number
///
#[inline]
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
