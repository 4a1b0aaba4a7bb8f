//! # Nested Sheet
//!
//! Recovers nested tables from spreadsheet grids whose only layout signal is cell borders,
//! as found in the band combination tables of 3GPP specifications.
//!
//! ## Features
//!
//! - **Border-driven segmentation**: logical rows split at full-width top borders, logical
//!   columns at full-height left borders, parent columns nest to any depth
//! - **Rich text normalization**: superscript and subscript footnote markers separate the
//!   values of a cell instead of polluting them
//! - **Near-white tolerance**: borders drawn in near-white are not treated as separators
//! - **Pure Rust xlsx reader**: shared strings, inline strings, border styles and rich text
//!   runs read straight from the package with `zip` and `quick-xml`
//! - **Metadata sheet**: document name, version, table number, title and the data
//!   rectangle come from a key/value sheet next to the table
//!
//! ## Usage
//!
//! ```no_run
//! use nested_sheet::{parse_workbook, ParseOptions, XlsxWorkbook};
//!
//! let mut workbook = XlsxWorkbook::open("table_5.3B.1.3-1.xlsx")?;
//! let (metadata, table) = parse_workbook(&mut workbook, &ParseOptions::default())?;
//! println!("{} {}: {} rows", metadata.spec_name(), metadata.table_serial_number(), table.rows().len());
//! # Ok::<(), nested_sheet::NestedSheetError>(())
//! ```
pub mod error;
mod helpers;
pub mod options;
pub mod spreadsheet;
pub mod table;

pub use error::NestedSheetError;
pub use options::ParseOptions;
pub use spreadsheet::metadata::parse_metadata;
pub use spreadsheet::metadata::TableMetadata;
pub use spreadsheet::reference::CellCoordinate;
pub use spreadsheet::reference::Rectangle;
pub use spreadsheet::GridSheet;
pub use spreadsheet::Worksheet;
pub use spreadsheet::XlsxWorkbook;
pub use table::parser::parse_table;
pub use table::parser::parse_workbook;
pub use table::parser::segment_rows;
pub use table::parser::TableParser;
pub use table::TableColumn;
pub use table::TableData;
pub use table::TableRow;
