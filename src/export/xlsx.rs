//! Excel workbook encoder.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde_json::Value;

use super::{columns_of, ExportError, TabularEncoder, XLSX_CONTENT_TYPE};
use crate::store::Row;

/// Columns per worksheet (A through XFD).
const MAX_COLUMNS: usize = 16_384;
/// Rows per worksheet, header included.
const MAX_ROWS: usize = 1_048_576;

/// Writes rows to a single-sheet `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct XlsxEncoder {
    sheet_name: String,
}

impl XlsxEncoder {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl TabularEncoder for XlsxEncoder {
    fn content_type(&self) -> &'static str {
        XLSX_CONTENT_TYPE
    }

    fn encode(&self, rows: &[Row]) -> Result<Vec<u8>, ExportError> {
        let columns = columns_of(rows)?;
        if columns.len() > MAX_COLUMNS {
            return Err(ExportError::TooLarge("column count"));
        }
        if rows.len() >= MAX_ROWS {
            return Err(ExportError::TooLarge("row count"));
        }

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;

        let header = Format::new().set_bold();
        for (col, name) in (0u16..).zip(&columns) {
            sheet.write_string_with_format(0, col, name, &header)?;
        }

        // Keys absent from a later row leave the cell blank; extra keys are dropped.
        for (row_idx, row) in (1u32..).zip(rows) {
            for (col, name) in (0u16..).zip(&columns) {
                if let Some(value) = row.get(name) {
                    write_cell(sheet, row_idx, col, value)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                sheet.write_number(row, col, f)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            sheet.write_string(row, col, s)?;
        }
        nested => {
            sheet.write_string(row, col, nested.to_string())?;
        }
    }
    Ok(())
}
