//! This is the module handling the `check` sub-command.
//!

use eyre::Result;
use tracing::{info, trace};

use tabfetch_sources::{ContentSource, Tableau};

use crate::Config;

/// Sign in then out, nothing else.
///
#[tracing::instrument(skip(cfg))]
pub fn check_server(cfg: &Config) -> Result<()> {
    trace!("check_server({})", cfg.server.name);

    let source = Tableau::new(&cfg.server)?;
    let session = source.sign_in()?;
    info!("site {} user {}", session.site_id, session.user_id);
    source.sign_out(session)?;

    eprintln!("Server {} is reachable, credentials are valid.", source.name());
    Ok(())
}
