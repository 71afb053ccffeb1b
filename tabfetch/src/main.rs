use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tracing::{info, trace};

use tabfetch::{check_server, fetch_content, Config, Opts, SubCommand};
use tabfetch_common::init_logging;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging, stderr only until a run starts.
    //
    let _logging = init_logging(opts.verbose, None)?;

    // Banner
    //
    banner()?;

    handle_subcmd(&opts)
}

pub fn handle_subcmd(opts: &Opts) -> Result<()> {
    match &opts.subcmd {
        // Handle `fetch`
        //
        SubCommand::Fetch(fopts) => {
            trace!("fetch");

            let cfg = Config::load(opts.config.as_deref())?;
            let report = fetch_content(&cfg, fopts, opts.verbose)?;

            info!("Report in {:?}", report);
            eprintln!("Report in {}", report.display());
            eprintln!("Run is completed");
        }

        // Handle `check`
        //
        SubCommand::Check => {
            trace!("check");

            let cfg = Config::load(opts.config.as_deref())?;
            check_server(&cfg)?;
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", tabfetch::version());
            eprintln!("\t{}", tabfetch_common::version());
            eprintln!("\t{}", tabfetch_sources::version());
        }
    }
    Ok(())
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
