//! # Spreadsheet Access Module
//!
//! Read-only access to the cells of a worksheet: their text content, formatting runs
//! and border lines. Worksheets come either from an xlsx package ([`XlsxWorkbook`])
//! or are assembled in memory ([`GridSheet`]).
use crate::spreadsheet::cell::Cell;
use thiserror::Error;

pub mod cell;
pub(crate) mod excel;
pub mod metadata;
pub mod reference;
pub mod sheet;
pub(crate) mod styles;
pub mod text;
pub mod xlsx;

pub use sheet::GridSheet;
pub use xlsx::XlsxWorkbook;

/// Errors raised while loading a workbook package.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing workbook part '{0}'")]
    FileError(String),

    #[error("Spreadsheet '{0}' contains no sheet")]
    SpreadsheetEmptyError(String),
}

/// Read-only view of one worksheet.
///
/// Implementations must be safe for concurrent reads when several rectangles of the
/// same sheet are parsed in parallel; the parser never mutates a worksheet.
pub trait Worksheet {
    /// Name of the sheet.
    fn name(&self) -> &str;

    /// 0-based index of the last row present in the sheet, `None` for an empty sheet.
    fn last_row_index(&self) -> Option<usize>;

    /// The physical cell at the given 0-based position, `None` if absent.
    fn cell(&self, row: usize, column: usize) -> Option<&Cell>;
}
