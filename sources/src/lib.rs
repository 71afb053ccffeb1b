//! Module to deal with the Tableau Server we connect to in order to fetch content.
//!
//! The different submodules deal with:
//!
//! - authentication (sign-in returning a `Session`, sign-out),
//! - looking up workbook and view ids by name,
//! - fetching content (workbook package, view data, image and PDF) into local files.
//!
//! Everything is behind the `ContentSource` trait so the batch driver does not need to know
//! about HTTP at all.
//!

use std::fmt::Debug;
use std::path::{Path, PathBuf};

// Re-export these modules for a shorter import path.
//
pub use auth::*;
pub use content::*;
pub use error::*;
pub use outcome::*;
pub use session::*;
pub use tableau::*;

#[macro_use]
mod macros;

mod auth;
mod content;
mod error;
mod outcome;
mod session;
mod tableau;

/// This trait is the interface between the batch driver and the server.
///
/// Lookups return `Ok(None)` when nothing matches, which is not an error.
///
pub trait ContentSource: Debug {
    /// Return server's name
    fn name(&self) -> String;
    /// Sign in with the configured credentials
    fn sign_in(&self) -> Result<Session, AuthError>;
    /// Sign out, consuming the session
    fn sign_out(&self, session: Session) -> Result<(), AuthError>;
    /// Find a workbook id by its exact name
    fn resolve_workbook_id(&self, session: &Session, name: &str)
        -> Result<Option<String>, FetchError>;
    /// Find a view id by its content URL (`Workbook/sheets/Sheet`)
    fn resolve_view_id(&self, session: &Session, content_url: &str)
        -> Result<Option<String>, FetchError>;
    /// Download the workbook package into `dir`
    fn download_workbook(&self, session: &Session, id: &str, dir: &Path)
        -> Result<PathBuf, FetchError>;
    /// Download one rendering of a view into `dir`, file named after `stem`
    fn download_view(
        &self,
        session: &Session,
        id: &str,
        kind: ViewContent,
        dir: &Path,
        stem: &str,
    ) -> Result<PathBuf, FetchError>;
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
