//! This is the module handling the `fetch` sub-command.
//!
//! One run is:
//!
//! 1. prepare the working folders, archiving files from the previous run,
//! 2. start logging into the run's log file,
//! 3. read the input file,
//! 4. sign in (fatal if it fails),
//! 5. process every row,
//! 6. write the report,
//! 7. sign out (only logged if it fails).
//!

use std::path::PathBuf;

use chrono::Local;
use eyre::Result;
use tracing::{error, info, trace};

use tabfetch_common::{init_logging, Workdir};
use tabfetch_sources::{stamp, ContentSource, Tableau};

use crate::{summary_table, write_report, Batch, Config, FetchOpts, InputTable, Status};

/// Prefix of all files produced by a run
const PREFIX: &str = "tableau_content_download";

/// Whole run, returns the report path.
///
#[tracing::instrument(skip(cfg))]
pub fn fetch_content(cfg: &Config, fopts: &FetchOpts, verbose: u8) -> Result<PathBuf> {
    trace!("fetch_content");

    let folders = &cfg.folders;
    let archived = folders.prepare()?;

    // Everything from now on also goes into the run's log file.
    //
    let logname = format!("{}_{}.log", PREFIX, Local::now().format("%Y-%m-%d_%H%M%S"));
    let logging = init_logging(verbose, Some((folders.log.as_path(), logname.as_str())))?;
    info!("{} files from previous run archived", archived);
    if let Some(fname) = logging.file() {
        info!("Logging into {:?}", fname);
    }

    let input = fopts
        .input
        .as_ref()
        .or(cfg.input.as_ref())
        .ok_or(Status::MissingInput)?;
    let table = InputTable::read(input)?;

    let source = Tableau::new(&cfg.server)?;
    run_batch(&source, folders, &table)
}

/// Everything between sign-in and sign-out.
///
pub fn run_batch<S: ContentSource>(
    source: &S,
    folders: &Workdir,
    input: &InputTable,
) -> Result<PathBuf> {
    trace!("run_batch({})", source.name());

    let session = source.sign_in().map_err(|e| {
        error!("Sign-in to {} failed: {}", source.name(), e);
        e
    })?;

    let results = Batch::new(source, &session, &folders.download).run(input);

    let fname = folders
        .output
        .join(format!("{}_{}.csv", PREFIX, stamp(&Local::now())));
    let written = write_report(&fname, input, &results);

    // Sign out even if the report could not be written.
    //
    if let Err(e) = source.sign_out(session) {
        error!("Sign-out from {} failed: {}", source.name(), e);
    }
    written?;

    info!("Report - {:?}", fname);
    println!("{}", summary_table(&results));
    Ok(fname)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::batch::tests::{table, Fake};

    use super::*;

    fn folders(dir: &TempDir) -> Workdir {
        let w = Workdir::under(dir.path());
        w.prepare().unwrap();
        w
    }

    #[test]
    fn test_run_batch() -> Result<()> {
        let dir = TempDir::new()?;
        let w = folders(&dir);
        let fake = Fake::sales();

        let fname = run_batch(&fake, &w, &table(&["Sales,Summary,Y,Y,N,N", "Ops,KPI,N,N,N,N"]))?;

        assert!(fname.starts_with(&w.output));
        let name = fname.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("tableau_content_download_"));
        assert!(name.ends_with(".csv"));

        let content = fs::read_to_string(&fname)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(3, lines.len());
        assert!(lines[0].ends_with("WORKBOOK_ID,WORKBOOK_PATH,VIEW_URL,VIEW_ID,DATA_PATH,IMAGE_PATH,PDF_PATH"));
        assert!(lines[1].starts_with("Sales,Summary,Y,Y,N,N,wb-1,"));
        assert!(lines[1].ends_with(",,"));
        assert_eq!("Ops,KPI,N,N,N,N,,,Ops/sheets/KPI,,,,", lines[2]);

        let calls = fake.calls.borrow();
        assert_eq!("sign_in", calls[0]);
        assert_eq!("sign_out", calls[calls.len() - 1]);
        Ok(())
    }

    #[test]
    fn test_run_batch_sign_in_refused() -> Result<()> {
        let dir = TempDir::new()?;
        let w = folders(&dir);
        let fake = Fake {
            refuse_sign_in: true,
            ..Fake::sales()
        };

        assert!(run_batch(&fake, &w, &table(&["Sales,Summary,Y,Y,N,N"])).is_err());

        assert_eq!(vec!["sign_in"], *fake.calls.borrow());
        assert_eq!(0, fs::read_dir(&w.output)?.count());
        assert_eq!(0, fs::read_dir(&w.download)?.count());
        Ok(())
    }

    #[test]
    fn test_run_batch_report_error_still_signs_out() -> Result<()> {
        let dir = TempDir::new()?;
        let w = folders(&dir);
        fs::remove_dir(&w.output)?;
        let fake = Fake::sales();

        assert!(run_batch(&fake, &w, &table(&["Ops,KPI,N,N,N,N"])).is_err());
        assert_eq!("sign_out", fake.calls.borrow().last().unwrap());
        Ok(())
    }

    #[test]
    fn test_fetch_content_no_input() -> Result<()> {
        let dir = TempDir::new()?;
        let cfg = Config {
            version: 1,
            folders: Workdir::under(dir.path()),
            ..Default::default()
        };

        let err = fetch_content(&cfg, &FetchOpts::default(), 0).unwrap_err();
        assert!(matches!(err.downcast_ref::<Status>(), Some(Status::MissingInput)));
        assert!(dir.path().join("logs").exists());
        Ok(())
    }
}
