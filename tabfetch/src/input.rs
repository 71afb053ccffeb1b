//! Input spreadsheet (CSV).
//!
//! Required columns are in `COLUMNS`, any other column is carried over into the report as-is.
//! Rows are kept raw (bytes) and decoded one by one, so a bad row, invalid UTF-8 included, only
//! fails itself.
//!

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use eyre::Result;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, trace};

use crate::Status;

/// Required input columns
pub const COLUMNS: [&str; 6] = [
    "WORKBOOK_NAME",
    "WORKSHEET_NAME",
    "DOWNLOAD_WORKBOOK",
    "DOWNLOAD_DATA",
    "DOWNLOAD_IMAGE",
    "DOWNLOAD_PDF",
];

/// One line of the input file
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct InputRow {
    #[serde(rename = "WORKBOOK_NAME")]
    pub workbook_name: String,
    #[serde(rename = "WORKSHEET_NAME")]
    pub worksheet_name: String,
    #[serde(rename = "DOWNLOAD_WORKBOOK", deserialize_with = "yes_no")]
    pub download_workbook: bool,
    #[serde(rename = "DOWNLOAD_DATA", deserialize_with = "yes_no")]
    pub download_data: bool,
    #[serde(rename = "DOWNLOAD_IMAGE", deserialize_with = "yes_no")]
    pub download_image: bool,
    #[serde(rename = "DOWNLOAD_PDF", deserialize_with = "yes_no")]
    pub download_pdf: bool,
}

/// `Y` (any case) is yes, anything else is no.
///
fn yes_no<'de, D>(de: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(de)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}

/// The whole input file, read once.
///
#[derive(Clone, Debug)]
pub struct InputTable {
    headers: StringRecord,
    records: Vec<ByteRecord>,
}

impl InputTable {
    /// Read and check the header of the input file.
    ///
    #[tracing::instrument]
    pub fn read(fname: &Path) -> Result<Self> {
        trace!("reading {:?}", fname);

        let rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_path(fname)?;
        let table = Self::from_reader(rdr)?;

        info!("{:?} is read successfully, {} rows.", fname, table.len());
        Ok(table)
    }

    /// Same as `read()` from anything readable.
    ///
    pub fn from_reader<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let headers = rdr.headers()?.clone();
        debug!("headers = {:?}", headers);

        if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
            return Err(Status::MissingColumn(missing.to_string()).into());
        }

        let records = rdr.byte_records().collect::<Result<Vec<_>, _>>()?;
        Ok(InputTable { headers, records })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[ByteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decode row `i` (0-based).
    ///
    pub fn row(&self, i: usize) -> Result<InputRow> {
        let rec = self
            .records
            .get(i)
            .ok_or_else(|| Status::InvalidRow(format!("no row {}", i + 1)))?;
        let row: InputRow = rec
            .deserialize(Some(self.headers.as_byte_record()))
            .map_err(|e| Status::InvalidRow(e.to_string()))?;

        if row.workbook_name.trim().is_empty() {
            return Err(Status::InvalidRow("empty WORKBOOK_NAME".to_string()).into());
        }
        if row.worksheet_name.trim().is_empty() {
            return Err(Status::InvalidRow("empty WORKSHEET_NAME".to_string()).into());
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table(s: &str) -> Result<InputTable> {
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(s.as_bytes());
        InputTable::from_reader(rdr)
    }

    const HDR: &str =
        "WORKBOOK_NAME,WORKSHEET_NAME,DOWNLOAD_WORKBOOK,DOWNLOAD_DATA,DOWNLOAD_IMAGE,DOWNLOAD_PDF";

    #[test]
    fn test_read_rows() -> Result<()> {
        let t = table(&format!(
            "{HDR}\nSales,Summary,Y,Y,N,N\nSales Report,Region Summary,n,y, Y ,\n"
        ))?;
        assert_eq!(2, t.len());

        let r = t.row(0)?;
        assert_eq!(
            InputRow {
                workbook_name: "Sales".to_string(),
                worksheet_name: "Summary".to_string(),
                download_workbook: true,
                download_data: true,
                download_image: false,
                download_pdf: false,
            },
            r
        );

        let r = t.row(1)?;
        assert_eq!("Sales Report", r.workbook_name);
        assert!(!r.download_workbook);
        assert!(r.download_data);
        assert!(r.download_image);
        assert!(!r.download_pdf);
        Ok(())
    }

    #[test]
    fn test_extra_columns_kept() -> Result<()> {
        let t = table(&format!("OWNER,{HDR}\nbob,Sales,Summary,Y,N,N,N\n"))?;
        assert_eq!(7, t.headers().len());
        assert_eq!(&b"bob"[..], &t.records()[0][0]);
        assert_eq!("Sales", t.row(0)?.workbook_name);
        Ok(())
    }

    #[test]
    fn test_missing_column() {
        let err = table("WORKBOOK_NAME,WORKSHEET_NAME\nSales,Summary\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Status>(),
            Some(Status::MissingColumn(c)) if c == "DOWNLOAD_WORKBOOK"
        ));
    }

    #[test]
    fn test_invalid_utf8_row() -> Result<()> {
        let mut data = format!("{HDR}\n").into_bytes();
        data.extend_from_slice(b"Sa\xfffes,Summary,Y,Y,N,N\nSales,Summary,N,N,N,N\n");
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(data.as_slice());

        let t = InputTable::from_reader(rdr)?;
        assert_eq!(2, t.len());
        assert!(matches!(
            t.row(0).unwrap_err().downcast_ref::<Status>(),
            Some(Status::InvalidRow(_))
        ));
        assert_eq!("Sales", t.row(1)?.workbook_name);
        Ok(())
    }

    #[rstest]
    #[case(",Summary,Y,Y,N,N")]
    #[case("Sales,  ,Y,Y,N,N")]
    #[case("Sales,Summary,Y")]
    fn test_invalid_row(#[case] line: &str) -> Result<()> {
        let t = table(&format!("{HDR}\n{line}\nSales,Summary,N,N,N,N\n"))?;
        assert_eq!(2, t.len());
        assert!(t.row(0).is_err());
        assert!(t.row(1).is_ok());
        Ok(())
    }
}
