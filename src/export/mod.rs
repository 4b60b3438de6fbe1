//! Tabular export subsystem.
//!
//! # Data Flow
//! ```text
//! Vec<Row> (from the store)
//!     → column set = keys of the first row, in order
//!     → xlsx.rs (header row + one sheet row per record)
//!     → Vec<u8> document streamed by the download handler
//! ```

pub mod xlsx;

use thiserror::Error;

use crate::store::Row;

pub use xlsx::XlsxEncoder;

/// MIME type of an Office Open XML workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export; the column set would be undefined.
    #[error("no rows to export")]
    Empty,

    #[error("{0} exceeds the worksheet limit")]
    TooLarge(&'static str),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Turns an ordered sequence of rows into a binary document.
pub trait TabularEncoder: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn encode(&self, rows: &[Row]) -> Result<Vec<u8>, ExportError>;
}

/// Column names for an export: the keys of the first row, in order.
pub fn columns_of(rows: &[Row]) -> Result<Vec<String>, ExportError> {
    rows.first()
        .map(|first| first.keys().cloned().collect())
        .ok_or(ExportError::Empty)
}
