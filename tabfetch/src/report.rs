//! Result of a run: one `ResultRow` per input row, written next to the input columns into the
//! report file, plus a short summary for the terminal.
//!

use std::path::{Path, PathBuf};

use csv::{ByteRecord, WriterBuilder};
use eyre::{eyre, Result};
use strum::IntoEnumIterator;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, trace};

use tabfetch_sources::{Outcome, ViewContent};

use crate::InputTable;

/// Columns added to the input ones
pub const RESULT_COLUMNS: [&str; 7] = [
    "WORKBOOK_ID",
    "WORKBOOK_PATH",
    "VIEW_URL",
    "VIEW_ID",
    "DATA_PATH",
    "IMAGE_PATH",
    "PDF_PATH",
];

/// What happened for one input row
///
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultRow {
    pub workbook_id: Outcome<String>,
    pub workbook_path: Outcome<PathBuf>,
    /// `Workbook/sheets/Sheet`
    pub view_url: String,
    pub view_id: Outcome<String>,
    pub data_path: Outcome<PathBuf>,
    pub image_path: Outcome<PathBuf>,
    pub pdf_path: Outcome<PathBuf>,
}

impl ResultRow {
    /// Outcome for one of the view renderings
    ///
    pub fn view(&self, kind: ViewContent) -> &Outcome<PathBuf> {
        match kind {
            ViewContent::Data => &self.data_path,
            ViewContent::Image => &self.image_path,
            ViewContent::Pdf => &self.pdf_path,
        }
    }

    pub fn view_mut(&mut self, kind: ViewContent) -> &mut Outcome<PathBuf> {
        match kind {
            ViewContent::Data => &mut self.data_path,
            ViewContent::Image => &mut self.image_path,
            ViewContent::Pdf => &mut self.pdf_path,
        }
    }

    /// Did anything fail in this row?
    ///
    pub fn has_errors(&self) -> bool {
        self.workbook_id.is_failed()
            || self.workbook_path.is_failed()
            || self.view_id.is_failed()
            || ViewContent::iter().any(|k| self.view(k).is_failed())
    }

    /// Report columns, in `RESULT_COLUMNS` order
    ///
    pub fn fields(&self) -> [String; 7] {
        [
            self.workbook_id.to_field(),
            self.workbook_path.to_field(),
            self.view_url.clone(),
            self.view_id.to_field(),
            self.data_path.to_field(),
            self.image_path.to_field(),
            self.pdf_path.to_field(),
        ]
    }
}

/// Write input rows and their results side by side.  A row without result (it failed before
/// anything could be recorded) gets empty result columns.
///
#[tracing::instrument(skip(input, results))]
pub fn write_report(fname: &Path, input: &InputTable, results: &[Option<ResultRow>]) -> Result<()> {
    trace!("write_report");

    if input.len() != results.len() {
        return Err(eyre!(
            "{} input rows but {} results",
            input.len(),
            results.len()
        ));
    }

    let mut wtr = WriterBuilder::new().from_path(fname)?;

    let width = input.headers().len();
    let mut hdr = input.headers().clone();
    RESULT_COLUMNS.iter().for_each(|c| hdr.push_field(c));
    wtr.write_record(&hdr)?;

    for (rec, res) in input.records().iter().zip(results) {
        let mut line = ByteRecord::new();
        (0..width).for_each(|i| line.push_field(rec.get(i).unwrap_or(b"")));
        match res {
            Some(res) => res.fields().iter().for_each(|f| line.push_field(f.as_bytes())),
            None => RESULT_COLUMNS.iter().for_each(|_| line.push_field(b"")),
        }
        wtr.write_byte_record(&line)?;
    }
    wtr.flush()?;

    debug!("{} rows written to {:?}", results.len(), fname);
    Ok(())
}

/// One line of the summary table
///
#[derive(Debug, Default, Eq, PartialEq, Tabled)]
pub struct SummaryLine {
    #[tabled(rename = "Content")]
    pub content: String,
    #[tabled(rename = "Done")]
    pub done: usize,
    #[tabled(rename = "Not requested")]
    pub not_requested: usize,
    #[tabled(rename = "Not found")]
    pub not_found: usize,
    #[tabled(rename = "Failed")]
    pub failed: usize,
}

impl SummaryLine {
    fn new(content: &str) -> Self {
        SummaryLine {
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn add<T>(&mut self, o: &Outcome<T>) {
        match o {
            Outcome::Done(_) => self.done += 1,
            Outcome::NotRequested => self.not_requested += 1,
            Outcome::NotFound => self.not_found += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Count outcomes per content type; rows without result count as failed everywhere.
///
pub fn summarize(results: &[Option<ResultRow>]) -> Vec<SummaryLine> {
    let mut wb = SummaryLine::new("workbook");
    let mut view = SummaryLine::new("view");
    let mut kinds: Vec<(ViewContent, SummaryLine)> = ViewContent::iter()
        .map(|k| (k, SummaryLine::new(&k.to_string())))
        .collect();

    let broken = Outcome::<PathBuf>::Failed(String::new());
    for res in results {
        match res {
            Some(res) => {
                wb.add(&res.workbook_path);
                view.add(&res.view_id);
                kinds.iter_mut().for_each(|(k, l)| l.add(res.view(*k)));
            }
            None => {
                wb.add(&broken);
                view.add(&broken);
                kinds.iter_mut().for_each(|(_, l)| l.add(&broken));
            }
        }
    }

    let mut lines = vec![wb, view];
    lines.extend(kinds.into_iter().map(|(_, l)| l));
    lines
}

/// Render the summary as a table
///
pub fn summary_table(results: &[Option<ResultRow>]) -> String {
    Table::new(summarize(results))
        .with(Style::modern())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::{ReaderBuilder, Trim};
    use std::fs;
    use tempfile::TempDir;

    fn input() -> InputTable {
        let s = "OWNER,WORKBOOK_NAME,WORKSHEET_NAME,DOWNLOAD_WORKBOOK,DOWNLOAD_DATA,DOWNLOAD_IMAGE,DOWNLOAD_PDF\n\
                 bob,Sales,Summary,Y,Y,N,N\n\
                 alice,Ops,KPI,N,N,N,Y\n";
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(s.as_bytes());
        InputTable::from_reader(rdr).unwrap()
    }

    fn sales() -> ResultRow {
        ResultRow {
            workbook_id: Outcome::Done("wb-1".to_string()),
            workbook_path: Outcome::Done(PathBuf::from("dl/Sales.twbx")),
            view_url: "Sales/sheets/Summary".to_string(),
            view_id: Outcome::Done("v-1".to_string()),
            data_path: Outcome::Done(PathBuf::from("dl/Sales_Summary_01012024_000000.csv")),
            image_path: Outcome::NotRequested,
            pdf_path: Outcome::NotRequested,
        }
    }

    #[test]
    fn test_fields() {
        let r = sales();
        assert_eq!(
            [
                "wb-1",
                "dl/Sales.twbx",
                "Sales/sheets/Summary",
                "v-1",
                "dl/Sales_Summary_01012024_000000.csv",
                "",
                ""
            ],
            r.fields()
        );
        assert!(!r.has_errors());

        let mut r = sales();
        *r.view_mut(ViewContent::Pdf) = Outcome::Failed("HTTP 500".to_string());
        assert_eq!("ERROR", r.fields()[6]);
        assert!(r.has_errors());
    }

    #[test]
    fn test_write_report() -> Result<()> {
        let dir = TempDir::new()?;
        let fname = dir.path().join("report.csv");

        write_report(&fname, &input(), &[Some(sales()), None])?;

        let content = fs::read_to_string(&fname)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(3, lines.len());
        assert_eq!(
            "OWNER,WORKBOOK_NAME,WORKSHEET_NAME,DOWNLOAD_WORKBOOK,DOWNLOAD_DATA,DOWNLOAD_IMAGE,DOWNLOAD_PDF,\
             WORKBOOK_ID,WORKBOOK_PATH,VIEW_URL,VIEW_ID,DATA_PATH,IMAGE_PATH,PDF_PATH",
            lines[0]
        );
        assert_eq!(
            "bob,Sales,Summary,Y,Y,N,N,wb-1,dl/Sales.twbx,Sales/sheets/Summary,v-1,dl/Sales_Summary_01012024_000000.csv,,",
            lines[1]
        );
        assert_eq!("alice,Ops,KPI,N,N,N,Y,,,,,,,", lines[2]);
        Ok(())
    }

    #[test]
    fn test_write_report_keeps_raw_bytes() -> Result<()> {
        let dir = TempDir::new()?;
        let fname = dir.path().join("report.csv");

        let data = b"WORKBOOK_NAME,WORKSHEET_NAME,DOWNLOAD_WORKBOOK,DOWNLOAD_DATA,DOWNLOAD_IMAGE,DOWNLOAD_PDF\n\
                     Sa\xffes,Summary,Y,Y,N,N\n";
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(&data[..]);
        let input = InputTable::from_reader(rdr)?;
        assert!(input.row(0).is_err());

        write_report(&fname, &input, &[None])?;

        let content = fs::read(&fname)?;
        assert!(content.ends_with(b"Sa\xffes,Summary,Y,Y,N,N,,,,,,,\n"));
        Ok(())
    }

    #[test]
    fn test_write_report_length_mismatch() {
        let dir = TempDir::new().unwrap();
        let fname = dir.path().join("report.csv");
        assert!(write_report(&fname, &input(), &[None]).is_err());
    }

    #[test]
    fn test_summarize() {
        let mut failed = sales();
        failed.view_id = Outcome::Failed("HTTP 500".to_string());
        failed.data_path = Outcome::Failed("HTTP 500".to_string());

        let lines = summarize(&[Some(sales()), Some(failed), None]);
        assert_eq!(5, lines.len());

        assert_eq!("workbook", lines[0].content);
        assert_eq!(2, lines[0].done);
        assert_eq!(1, lines[0].failed);

        assert_eq!("view", lines[1].content);
        assert_eq!(1, lines[1].done);
        assert_eq!(2, lines[1].failed);

        assert_eq!("data", lines[2].content);
        assert_eq!(1, lines[2].done);
        assert_eq!(2, lines[2].failed);

        assert_eq!("image", lines[3].content);
        assert_eq!(2, lines[3].not_requested);
        assert_eq!(1, lines[3].failed);
    }

    #[test]
    fn test_summary_table() {
        let t = summary_table(&[Some(sales())]);
        assert!(t.contains("Content"));
        assert!(t.contains("workbook"));
        assert!(t.contains("pdf"));
    }
}
