//! Module describing all possible commands and sub-commands to the `tabfetch` main driver
//!
//! - `fetch` runs the whole batch: prepare folders, sign in, process every input row, write the
//!   report and sign out,
//! - `check` only signs in and out to validate the configuration,
//! - `completion` is here just to configure the various shells completion system,
//! - `version` displays all modules versions.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};
use clap_complete::shells::Shell;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Verbose mode.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `check`
/// `completion SHELL`
/// `fetch [-i FILE]`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Check server access (sign in then out)
    Check,
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// Download content listed in the input file
    Fetch(FetchOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for a run.
///
#[derive(Debug, Default, Parser)]
pub struct FetchOpts {
    /// Input file (CSV), overrides the one in the configuration
    #[clap(short = 'i', long)]
    pub input: Option<PathBuf>,
}

// ------

#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}
