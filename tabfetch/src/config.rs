//! Configuration file for `tabfetch`, in HCL:
//!
//! ```hcl
//! version = 1
//! server {
//!   name        = "tableau.example.com"
//!   api_version = "3.7"
//!   site        = "finance"
//!   login       = "svc_user"
//!   password    = "secret"
//!   verify_tls  = false
//!   timeout     = 300   # seconds, no timeout if absent
//! }
//! folders {
//!   log      = "logs"
//!   download = "downloads"
//!   output   = "output"
//!   archive  = "archive"
//! }
//! input = "input.csv"
//! ```
//!
//! Relative paths are relative to the directory holding the configuration file.
//!

use std::path::{Path, PathBuf};

use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use tabfetch_common::{ConfigFile, Versioned, Workdir};
use tabfetch_sources::Server;

use crate::Status;

/// Current version
pub const CVERSION: usize = 1;

/// Configuration for the CLI tool: server and credentials, working folders and input file.
///
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub version: usize,
    /// Server and credentials
    pub server: Server,
    /// Working folders
    #[serde(default)]
    pub folders: Workdir,
    /// Default input file
    pub input: Option<PathBuf>,
}

impl Versioned for Config {
    fn version(&self) -> usize {
        self.version
    }
}

impl Config {
    /// Load the given file or the default one and check its version.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Config> {
        let fname = match fname {
            Some(fname) => fname.to_path_buf(),
            None => ConfigFile::<Config>::default_file()?,
        };
        if !fname.exists() {
            return Err(Status::MissingConfig(fname.to_string_lossy().to_string()).into());
        }

        let cfg = ConfigFile::<Config>::load(Some(&fname))?;
        if cfg.version() != CVERSION {
            return Err(Status::BadFileVersion(cfg.version()).into());
        }

        let base = cfg.basedir().to_path_buf();
        let mut cfg = cfg.into_inner();
        cfg.folders = cfg.folders.rebase(&base);
        cfg.input = cfg
            .input
            .map(|p| if p.is_relative() { base.join(p) } else { p });
        debug!("server = {}", cfg.server);
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CFG: &str = r##"
version = 1
server {
  name     = "tableau.example.com"
  site     = "finance"
  login    = "user"
  password = "pass"
  timeout  = 300
}
folders {
  log      = "logs"
  download = "dl"
  output   = "/tmp/tabfetch-out"
  archive  = "archive"
}
input = "input.csv"
"##;

    #[test]
    fn test_config_load() -> Result<()> {
        let dir = TempDir::new()?;
        let fname = dir.path().join("config.hcl");
        fs::write(&fname, CFG)?;

        let cfg = Config::load(Some(&fname))?;
        let base = dir.path().canonicalize()?;

        assert_eq!(CVERSION, cfg.version());
        assert_eq!("tableau.example.com", cfg.server.name);
        assert_eq!("3.7", cfg.server.api_version);
        assert!(!cfg.server.verify_tls);
        assert_eq!(Some(300), cfg.server.timeout);
        assert_eq!(base.join("logs"), cfg.folders.log);
        assert_eq!(base.join("dl"), cfg.folders.download);
        assert_eq!(PathBuf::from("/tmp/tabfetch-out"), cfg.folders.output);
        assert_eq!(Some(base.join("input.csv")), cfg.input);
        Ok(())
    }

    #[test]
    fn test_config_default_folders() -> Result<()> {
        let dir = TempDir::new()?;
        let fname = dir.path().join("config.hcl");
        fs::write(
            &fname,
            "version = 1\nserver {\n name = \"x\"\n login = \"u\"\n password = \"p\"\n}\n",
        )?;

        let cfg = Config::load(Some(&fname))?;
        let base = dir.path().canonicalize()?;
        assert_eq!(Workdir::under(&base), cfg.folders);
        assert!(cfg.input.is_none());
        Ok(())
    }

    #[test]
    fn test_config_bad_version() -> Result<()> {
        let dir = TempDir::new()?;
        let fname = dir.path().join("config.hcl");
        fs::write(&fname, CFG.replace("version = 1", "version = 2"))?;

        let err = Config::load(Some(&fname)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Status>(),
            Some(Status::BadFileVersion(2))
        ));
        Ok(())
    }

    #[test]
    fn test_config_missing() {
        let err = Config::load(Some(Path::new("/nonexistent/config.hcl"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Status>(),
            Some(Status::MissingConfig(_))
        ));
    }
}
