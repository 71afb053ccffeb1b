//! Content types we can fetch and how the resulting files are named.
//!
//! - the workbook package keeps the name sent by the server in `Content-Disposition`,
//! - view renderings are named `<Workbook>_<Sheet>_<DDMMYYYY_HHMMSS>.<ext>`.
//!

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use strum::{EnumIter, EnumString};

/// Format of the timestamp in downloaded and report file names
pub const STAMP_FMT: &str = "%d%m%Y_%H%M%S";

/// The three renderings of a view
///
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumIter, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ViewContent {
    /// CSV export of the underlying data
    Data,
    /// PNG
    Image,
    Pdf,
}

impl ViewContent {
    /// Last element of the endpoint, `/views/{id}/<endpoint>`
    ///
    pub fn endpoint(&self) -> String {
        self.to_string()
    }

    /// File extension of the downloaded file
    ///
    pub fn extension(&self) -> &'static str {
        match self {
            ViewContent::Data => "csv",
            ViewContent::Image => "png",
            ViewContent::Pdf => "pdf",
        }
    }
}

/// Content URL of a view as used in the `contentUrl` filter: spaces are not part of it.
///
/// ```
/// use tabfetch_sources::view_url;
///
/// assert_eq!("SalesReport/sheets/Summary", view_url("Sales Report", "Summary"));
/// ```
///
pub fn view_url(workbook: &str, sheet: &str) -> String {
    format!("{}/sheets/{}", strip_spaces(workbook), strip_spaces(sheet))
}

/// Base of the file names for a view, `Workbook/sheets/Sheet` becomes `Workbook_Sheet`.
///
pub fn file_stem(view_url: &str) -> String {
    view_url.replace("/sheets/", "_")
}

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| *c != ' ').collect()
}

/// Format a timestamp the way we use it in file names
///
pub fn stamp<Tz: TimeZone>(tm: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    tm.format(STAMP_FMT).to_string()
}

/// Extract the file name from a `Content-Disposition` header.
///
/// Only the last path component is kept so a server can not make us write outside of our folder.
///
pub fn filename_from_disposition(header: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"filename="(.+?)""#).expect("valid regex"));

    let name = re.captures(header)?.get(1)?.as_str();
    let name = Path::new(name).file_name()?.to_string_lossy().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Find a file name in `dir` that does not exist yet, adding `_1`, `_2`, etc. to `stem`
/// when needed.
///
pub fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{stem}.{ext}"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{stem}_{n}.{ext}"));
        n += 1;
    }
    path
}
