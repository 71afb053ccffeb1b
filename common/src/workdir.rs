//! Working folders management.
//!
//! A run uses four folders:
//!
//! - `log`: one log file per run,
//! - `download`: every file fetched during the run,
//! - `output`: the final report,
//! - `archive`: where everything left by the previous run is moved at startup.
//!
//! Archiving only considers `*.log` files in `log` and files with an extension in `download`
//! and `output`.  If the archive already has a file with the same name, the old archived copy is
//! removed first so we only ever keep the latest one.
//!

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Error)]
pub enum WorkdirError {
    #[error("Can not create folder {0:?}: {1}")]
    Create(PathBuf, io::Error),
    #[error("Can not read folder {0:?}: {1}")]
    List(PathBuf, io::Error),
    #[error("Can not archive {0:?}: {1}")]
    Archive(PathBuf, io::Error),
}

/// All the folders used during a run, as found in the `folders` block of the configuration.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Workdir {
    /// Log files
    pub log: PathBuf,
    /// Transient per-run downloads
    pub download: PathBuf,
    /// Final report
    pub output: PathBuf,
    /// Previous run's artifacts
    pub archive: PathBuf,
}

impl Default for Workdir {
    fn default() -> Self {
        Workdir {
            log: PathBuf::from("logs"),
            download: PathBuf::from("downloads"),
            output: PathBuf::from("output"),
            archive: PathBuf::from("archive"),
        }
    }
}

impl Workdir {
    /// All folders under a single base directory, with the default names
    ///
    pub fn under(base: &Path) -> Self {
        let def = Workdir::default();
        Workdir {
            log: base.join(def.log),
            download: base.join(def.download),
            output: base.join(def.output),
            archive: base.join(def.archive),
        }
    }

    /// Make relative folders relative to `base` (usually the configuration file directory).
    ///
    pub fn rebase(self, base: &Path) -> Self {
        let fix = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Workdir {
            log: fix(self.log),
            download: fix(self.download),
            output: fix(self.output),
            archive: fix(self.archive),
        }
    }

    /// Create all folders if needed then move the previous run's files into the archive.
    ///
    /// Returns the number of archived files.
    ///
    #[tracing::instrument]
    pub fn prepare(&self) -> Result<usize, WorkdirError> {
        for dir in [&self.log, &self.download, &self.output, &self.archive] {
            fs::create_dir_all(dir).map_err(|e| WorkdirError::Create(dir.clone(), e))?;
        }

        // Folders may be shared, compare real paths so a file is only moved once and never
        // onto itself.
        //
        let archive = real_path(&self.archive)?;
        let mut prev = vec![];
        for (dir, logs_only) in [
            (&self.log, true),
            (&self.download, false),
            (&self.output, false),
        ] {
            let dir = real_path(dir)?;
            if dir == archive {
                trace!("{:?} is the archive, skipped", dir);
                continue;
            }
            prev.extend(files_in(&dir, |p| {
                if logs_only {
                    has_extension(p, "log")
                } else {
                    p.extension().is_some()
                }
            })?);
        }
        prev.sort();
        prev.dedup();

        for f in prev.iter() {
            self.archive_one(f)?;
        }
        debug!("{} files archived", prev.len());
        Ok(prev.len())
    }

    /// Move one file into the archive folder, replacing any older copy.
    ///
    fn archive_one(&self, file: &Path) -> Result<(), WorkdirError> {
        let err = |e| WorkdirError::Archive(file.to_path_buf(), e);

        let Some(name) = file.file_name() else {
            return Ok(());
        };
        let target = self.archive.join(name);
        if target.exists() {
            trace!("replacing archived {:?}", target);
            fs::remove_file(&target).map_err(err)?;
        }

        // `rename` fails across filesystems, fallback to copy & remove.
        //
        if let Err(e) = fs::rename(file, &target) {
            warn!("rename {:?} failed ({}), copying instead", file, e);
            fs::copy(file, &target).map_err(err)?;
            fs::remove_file(file).map_err(err)?;
        }
        trace!("archived {:?}", target);
        Ok(())
    }
}

fn real_path(dir: &Path) -> Result<PathBuf, WorkdirError> {
    dir.canonicalize()
        .map_err(|e| WorkdirError::List(dir.to_path_buf(), e))
}

fn has_extension(p: &Path, ext: &str) -> bool {
    p.extension().is_some_and(|e| e == ext)
}

/// Regular files of `dir` matching `keep`, sorted for reproducibility.
///
fn files_in<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>, WorkdirError>
where
    F: Fn(&Path) -> bool,
{
    let err = |e| WorkdirError::List(dir.to_path_buf(), e);

    let mut files = vec![];
    for entry in fs::read_dir(dir).map_err(err)? {
        let path = entry.map_err(err)?.path();
        if path.is_file() && keep(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
