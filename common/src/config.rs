//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default location for the configuration file of `tabfetch`.
//! This is a configuration file/struct neutral loading engine, storing only the base directory
//! and with `load()` read the proper file or the default one.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.inner_mut()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::Versioned;

/// Config filename
const CONFIG: &str = "config.hcl";

/// Main name for the directory base
const TAG: &str = "tabfetch";

/// Configuration for the CLI tool, supposed to include parameters and most importantly
/// credentials for the server.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// This is the base directory for all files.
    basedir: PathBuf,
    /// Which file was actually read.
    path: PathBuf,
    inner: T,
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Returns the default config directory, `$HOME/.config/tabfetch` on UNIX and
    /// `%LOCALAPPDATA%\tabfetch` on Windows.
    ///
    #[tracing::instrument]
    pub fn config_path() -> Result<PathBuf> {
        let base = BaseDirs::new().ok_or_else(|| eyre!("No home directory, can not continue"))?;

        #[cfg(unix)]
        let base = base.home_dir().join(".config");

        #[cfg(windows)]
        let base = base.data_local_dir().to_path_buf();

        debug!("base = {base:?}");
        Ok(base.join(TAG))
    }

    /// Returns the path of the default config file
    ///
    #[tracing::instrument]
    pub fn default_file() -> Result<PathBuf> {
        let cfg = Self::config_path()?.join(CONFIG);
        debug!("default = {cfg:?}");
        Ok(cfg)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<ConfigFile<T>> {
        let fname = match fname {
            Some(fname) => fname.to_path_buf(),
            None => Self::default_file()?,
        };

        // Use a full path
        //
        if !fname.exists() {
            return Err(eyre!("Unknown config file {:?}", fname));
        }
        let fname = fname.canonicalize()?;
        let basedir = fname
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        trace!("Loading config file {fname:?}");

        let data = fs::read_to_string(&fname)?;
        let inner: T = hcl::from_str(&data)?;
        debug!("struct data = {inner:?}");

        Ok(ConfigFile {
            basedir,
            path: fname,
            inner,
        })
    }

    /// Directory holding the loaded file
    ///
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Full path of the loaded file
    ///
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Version number found in the file
    ///
    pub fn version(&self) -> usize {
        self.inner.version()
    }

    /// Return the inner configuration file
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Return the inner configuration file as putable
    ///
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the wrapper
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}
