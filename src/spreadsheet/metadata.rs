//! Key/value metadata describing where a table lives and which document it comes from.
use crate::error::NestedSheetError;
use crate::error::ResultMessage;
use crate::options::ParseOptions;
use crate::spreadsheet::reference::CellCoordinate;
use crate::spreadsheet::reference::Rectangle;
use crate::spreadsheet::Worksheet;
use crate::table::border::BorderQuery;
use std::collections::HashMap;
use tracing::debug;
use tracing::warn;

const KEY_SPEC_NAME: &str = "Spec";
const KEY_SPEC_VERSION: &str = "Version";
const KEY_SERIAL_NUMBER: &str = "Number";
const KEY_TITLE: &str = "Title";
const KEY_TOP_LEFT: &str = "Top left";
const KEY_BOTTOM_RIGHT: &str = "Bottom right";

const KEYS: [&str; 6] = [
    KEY_SPEC_NAME,
    KEY_SPEC_VERSION,
    KEY_SERIAL_NUMBER,
    KEY_TITLE,
    KEY_TOP_LEFT,
    KEY_BOTTOM_RIGHT,
];

/// Identity of a table and the rectangle holding its data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableMetadata {
    spec_name: String,
    spec_version: String,
    table_serial_number: String,
    table_title: String,
    rectangle: Rectangle,
}

impl TableMetadata {
    pub fn new(
        spec_name: &str,
        spec_version: &str,
        table_serial_number: &str,
        table_title: &str,
        rectangle: Rectangle,
    ) -> Self {
        TableMetadata {
            spec_name: spec_name.to_owned(),
            spec_version: spec_version.to_owned(),
            table_serial_number: table_serial_number.to_owned(),
            table_title: table_title.to_owned(),
            rectangle,
        }
    }

    /// Name of the document, e.g. "38.101-3".
    pub fn spec_name(&self) -> &str {
        &self.spec_name
    }

    /// Version of the document, e.g. "h50".
    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    /// Number of the table within the document, e.g. "5.3B.1.3-1".
    pub fn table_serial_number(&self) -> &str {
        &self.table_serial_number
    }

    pub fn table_title(&self) -> &str {
        &self.table_title
    }

    /// The data region of the table.
    pub fn rectangle(&self) -> &Rectangle {
        &self.rectangle
    }
}

/// Reads table metadata from a key/value sheet
///
/// Each row holds at most one entry: within the first `metadata_max_column` columns,
/// the first non-empty cell is the key and the next non-empty cell its value. A key
/// without a value maps to an empty string. Unknown keys are skipped.
///
/// # Arguments
/// * `sheet` - The metadata sheet, `None` if the workbook lacks it
/// * `options` - Sheet names and column bounds
///
/// # Returns
/// The metadata, or `InvalidArgument` if the sheet is absent, a key is missing or
/// repeated, or a corner is not a valid cell name
pub fn parse_metadata<W: Worksheet + ?Sized>(
    sheet: Option<&W>,
    options: &ParseOptions,
) -> Result<TableMetadata, NestedSheetError> {
    let sheet = sheet.ok_or_else(|| {
        NestedSheetError::InvalidArgument(format!("Unable to find {} sheet", options.metadata_sheet_name))
    })?;
    let query = BorderQuery::new(sheet, options);
    let columns = options.metadata_max_column.min(options.max_column + 1);

    let mut entries = HashMap::<&'static str, String>::new();
    for row in sheet.last_row_index().map_or(0..0, |last| 0..last + 1) {
        let mut texts = Vec::<String>::with_capacity(2);
        for column in 0..columns {
            let text = query.cell_text(row, column)?;
            if !text.is_empty() {
                texts.push(text);
                if texts.len() == 2 {
                    break;
                }
            }
        }

        let mut texts = texts.into_iter();
        let key = match texts.next() {
            Some(key) => key,
            None => continue,
        };
        let value = texts.next().unwrap_or_default();
        match KEYS.iter().find(|known| **known == key) {
            Some(known) => {
                if entries.insert(*known, value).is_some() {
                    return Err(NestedSheetError::InvalidArgument(format!(
                        "Duplicate metadata key '{}' at row {}",
                        key,
                        row + 1
                    )));
                }
            }
            None => warn!(sheet = %sheet.name(), row = row + 1, key = %key, "Ignoring unknown metadata key"),
        }
    }

    let mut take = |key: &str| {
        entries
            .remove(key)
            .ok_or_else(|| NestedSheetError::InvalidArgument(format!("Missing metadata key '{}'", key)))
    };
    let spec_name = take(KEY_SPEC_NAME)?;
    let spec_version = take(KEY_SPEC_VERSION)?;
    let table_serial_number = take(KEY_SERIAL_NUMBER)?;
    let table_title = take(KEY_TITLE)?;
    let top_left = take(KEY_TOP_LEFT)?
        .parse::<CellCoordinate>()
        .with_prefix(&format!("Metadata '{}'", KEY_TOP_LEFT))?;
    let bottom_right = take(KEY_BOTTOM_RIGHT)?
        .parse::<CellCoordinate>()
        .with_prefix(&format!("Metadata '{}'", KEY_BOTTOM_RIGHT))?;
    let rectangle = Rectangle::new(top_left, bottom_right)?;

    debug!(
        spec = %spec_name,
        version = %spec_version,
        number = %table_serial_number,
        rectangle = %rectangle,
        "Parsed table metadata"
    );
    Ok(TableMetadata {
        spec_name,
        spec_version,
        table_serial_number,
        table_title,
        rectangle,
    })
}
