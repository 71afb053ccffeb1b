//! Batch driver.
//!
//! Walk the input rows in order and, for each of them:
//!
//! 1. if asked, look up the workbook and download its package,
//! 2. always look up the view (`Workbook/sheets/Sheet`),
//! 3. if asked, download the view data, image and PDF.
//!
//! Every step gives an `Outcome`, a failed step never stops the row nor the run.  A row that can
//! not even be decoded gets no `ResultRow` at all.
//!

use std::path::{Path, PathBuf};

use strum::IntoEnumIterator;
use tracing::{error, info, info_span, trace};

use tabfetch_sources::{file_stem, view_url, ContentSource, Outcome, Session, ViewContent};

use crate::{InputRow, InputTable, ResultRow};

/// Everything needed to process rows within one session
///
#[derive(Debug)]
pub struct Batch<'a, S: ContentSource> {
    source: &'a S,
    session: &'a Session,
    /// Where downloaded files go
    download: &'a Path,
    /// Print one status line per row on stdout
    progress: bool,
}

impl<'a, S: ContentSource> Batch<'a, S> {
    pub fn new(source: &'a S, session: &'a Session, download: &'a Path) -> Self {
        Batch {
            source,
            session,
            download,
            progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    /// Process all rows, returning exactly one entry per input row, in order.
    ///
    pub fn run(&self, input: &InputTable) -> Vec<Option<ResultRow>> {
        let total = input.len();

        (0..total)
            .map(|i| {
                let span = info_span!("row", n = i + 1);
                let _enter = span.enter();

                let res = input.row(i).map(|row| self.process(&row));
                let (res, status) = match res {
                    Ok(res) => {
                        info!(
                            "Record {} - workbook {}, view {}, data {}, image {}, pdf {}",
                            i + 1,
                            res.workbook_path.label(),
                            res.view_id.label(),
                            res.data_path.label(),
                            res.image_path.label(),
                            res.pdf_path.label()
                        );
                        (Some(res), "processed")
                    }
                    Err(e) => {
                        error!("Record - {} processing is failed. Due to {}", i + 1, e);
                        (None, "failed")
                    }
                };
                info!("Out of {}, {} - {}", total, i + 1, status);
                if self.progress {
                    println!("Out of {}, {} - {}", total, i + 1, status);
                }
                res
            })
            .collect()
    }

    /// All the steps for a single row.
    ///
    #[tracing::instrument(skip(self))]
    pub fn process(&self, row: &InputRow) -> ResultRow {
        trace!("process");

        let (workbook_id, workbook_path) = if row.download_workbook {
            let id = Outcome::from_lookup(
                self.source
                    .resolve_workbook_id(self.session, &row.workbook_name),
            );
            let path = id.and_then(|id| {
                Outcome::from_fetch(self.source.download_workbook(self.session, id, self.download))
            });
            (id, path)
        } else {
            (Outcome::NotRequested, Outcome::NotRequested)
        };

        let view_url = view_url(&row.workbook_name, &row.worksheet_name);
        let view_id = Outcome::from_lookup(self.source.resolve_view_id(self.session, &view_url));

        let mut res = ResultRow {
            workbook_id,
            workbook_path,
            view_url,
            view_id,
            ..Default::default()
        };

        let stem = file_stem(&res.view_url);
        for kind in ViewContent::iter() {
            let wanted = match kind {
                ViewContent::Data => row.download_data,
                ViewContent::Image => row.download_image,
                ViewContent::Pdf => row.download_pdf,
            };
            *res.view_mut(kind) = self.fetch_view(wanted, &res.view_id, kind, &stem);
        }
        res
    }

    /// Only called when asked for, and only if the view was found.
    ///
    fn fetch_view(
        &self,
        wanted: bool,
        view_id: &Outcome<String>,
        kind: ViewContent,
        stem: &str,
    ) -> Outcome<PathBuf> {
        if !wanted {
            return Outcome::NotRequested;
        }
        view_id.and_then(|id| {
            Outcome::from_fetch(
                self.source
                    .download_view(self.session, id, kind, self.download, stem),
            )
        })
    }
}
