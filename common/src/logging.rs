//! Common logging initializer
//!
//! Logging is scoped to a run: `init_logging()` installs the subscriber for the current thread
//! and returns a `Logging` guard, everything is flushed and uninstalled when it is dropped.
//!

use std::path::{Path, PathBuf};

use eyre::Result;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing::trace;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Live logging context for one run
///
#[derive(Debug)]
pub struct Logging {
    /// Log file for this run, if any
    file: Option<PathBuf>,
    _guard: DefaultGuard,
}

impl Logging {
    /// Log file for this run, if any
    ///
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Map `-v` count into a level
///
fn level_of(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Setup logging for a run.
///
/// - stderr gets what `RUST_LOG` asks for or, if not set, a level derived from `verbose`,
/// - the log file, if `log_file` is given as (folder, filename), gets everything from `info`
///   (`debug` when verbose).
///
pub fn init_logging(verbose: u8, log_file: Option<(&Path, &str)>) -> Result<Logging> {
    // Load filters from environment
    //
    let filter = EnvFilter::builder()
        .with_default_directive(level_of(verbose).into())
        .from_env_lossy();

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter);

    // Log to file?
    //
    let (file, path) = match log_file {
        Some((dir, fname)) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(fname)
                .build(dir)?;
            let level = if verbose > 0 {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            };
            let layer = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(false)
                .with_filter(level);
            (Some(layer), Some(dir.join(fname)))
        }
        None => (None, None),
    };

    // Combine filters & exporters
    //
    let subscriber = tracing_subscriber::registry().with(stderr).with(file);
    let guard = tracing::subscriber::set_default(subscriber);

    trace!("Logging initialised.");
    Ok(Logging {
        file: path,
        _guard: guard,
    })
}
