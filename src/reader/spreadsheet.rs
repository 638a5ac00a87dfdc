//! XLSX reader built on calamine.

use crate::error::{Off2TxtError, Result};
use calamine::{Data, Range, Reader, Xlsx};
use std::io::{Read, Seek};
use std::path::Path;

/// Reads every row of every worksheet as a list of cell strings.
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<R: Read + Seek>(&self, reader: R, path: &Path) -> Result<Vec<Vec<String>>> {
        let mut workbook: Xlsx<R> = Xlsx::new(reader).map_err(|e| Off2TxtError::Spreadsheet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let sheet_names = workbook.sheet_names().to_owned();
        let mut rows = Vec::new();

        for name in sheet_names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| Off2TxtError::Spreadsheet {
                    path: path.to_path_buf(),
                    message: format!("sheet '{}': {}", name, e),
                })?;
            log::debug!("{}: sheet '{}' has {} rows", path.display(), name, range.height());
            rows.extend(range_to_rows(&range));
        }

        Ok(rows)
    }
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows as they appear on the sheet, anchored at A1: calamine trims leading
/// empty rows and columns, so they are padded back in.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (start_row, start_col) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(),
    };
    let width = start_col + range.width();

    let mut rows = vec![vec![String::new(); width]; start_row];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![String::new(); start_col];
        cells.extend(row.iter().map(cell_to_string));
        cells
    }));
    rows
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        _ => cell.to_string(),
    }
}
