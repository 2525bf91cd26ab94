//! Spreadsheet row readers for the import pipeline.
//!
//! Both formats yield rows keyed by the lower-cased header text. Empty cells
//! are left out, so a key is present only when the row carries a value for it.

use crate::errors::{Error, Result};
use calamine::{Data, Reader, Xlsx};
use std::collections::HashMap;
use std::io::Cursor;

/// One data row, keyed by lower-cased header.
pub type ImportRow = HashMap<String, String>;

/// Supported import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// Picks the format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

/// Reads all data rows of an uploaded file.
pub fn read_rows(format: ImportFormat, bytes: &[u8]) -> Result<Vec<ImportRow>> {
    match format {
        ImportFormat::Csv => read_csv(bytes),
        ImportFormat::Xlsx => read_xlsx(bytes),
    }
}

fn header_key(text: &str) -> String {
    text.trim().to_lowercase()
}

fn keyed_row<I>(headers: &[String], cells: I) -> ImportRow
where
    I: IntoIterator<Item = String>,
{
    headers
        .iter()
        .zip(cells)
        .filter(|(header, value)| !header.is_empty() && !value.trim().is_empty())
        .map(|(header, value)| (header.clone(), value.trim().to_string()))
        .collect()
}

/// Reads comma separated rows; the first record is the header.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader.headers()?.iter().map(header_key).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(keyed_row(&headers, record.iter().map(str::to_string)));
    }
    Ok(rows)
}

/// Reads the first worksheet of an `.xlsx` workbook; the first row is the
/// header.
pub fn read_xlsx(bytes: &[u8]) -> Result<Vec<ImportRow>> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes))
        .map_err(calamine::Error::Xlsx)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };
    let range = range.map_err(calamine::Error::Xlsx)?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(|c| header_key(&cell_text(c))).collect();

    Ok(sheet_rows
        .map(|cells| keyed_row(&headers, cells.iter().map(cell_text)))
        .collect())
}

/// Text of a spreadsheet cell. Dates are written day-month-year, the way
/// birth dates are typed in the CSV files.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d-%m-%Y").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImportFormat::from_file_name("birds.csv").unwrap(), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_file_name("Birds.XLSX").unwrap(), ImportFormat::Xlsx);

        let err = ImportFormat::from_file_name("birds.ods").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ods"));
        assert!(ImportFormat::from_file_name("no_extension").is_err());
    }

    #[test]
    fn test_csv_headers_are_case_insensitive() {
        let data = b"Ringnummer,Geslacht, Kleur \n5TJJ-81-2018,Pop,Grijs\n";
        let rows = read_csv(data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["ringnummer"], "5TJJ-81-2018");
        assert_eq!(rows[0]["geslacht"], "Pop");
        assert_eq!(rows[0]["kleur"], "Grijs");
    }

    #[test]
    fn test_csv_empty_cells_are_absent() {
        let data = b"ringnummer,moeder,vader\nA-1,,B-2\nA-2\n";
        let rows = read_csv(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].contains_key("moeder"));
        assert_eq!(rows[0]["vader"], "B-2");
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_quoted_csv_values_keep_commas() {
        let data = b"ringnummer,kweker\nA-1,\"Vries, Henk\"\n";
        let rows = read_csv(data).unwrap();
        assert_eq!(rows[0]["kweker"], "Vries, Henk");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Grijs".to_string())), "Grijs");
        assert_eq!(cell_text(&Data::Int(7)), "7");
    }

    #[test]
    fn test_garbage_xlsx_is_an_error() {
        assert!(read_xlsx(b"definitely not a zip file").is_err());
    }
}
