//! Recursive segmentation of a bordered rectangle into a [`TableData`] tree.
//!
//! A rectangle splits into logical rows at every top border that runs across its full
//! width. Inside one logical row, each column is classified by whether some interior
//! row draws a top border over it; runs of unsplit columns become leaf columns (cut at
//! full-height left borders), runs of split columns become one parent column segmented
//! again as rows.
use crate::error::NestedSheetError;
use crate::error::ResultMessage;
use crate::options::ParseOptions;
use crate::spreadsheet::metadata::parse_metadata;
use crate::spreadsheet::metadata::TableMetadata;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::Rectangle;
use crate::spreadsheet::Worksheet;
use crate::spreadsheet::XlsxWorkbook;
use crate::table::border::BorderQuery;
use crate::table::TableColumn;
use crate::table::TableData;
use crate::table::TableRow;
use tracing::debug;
use tracing::trace;

/// Segments rectangles of one worksheet.
pub struct TableParser<'a, W: Worksheet + ?Sized> {
    query: BorderQuery<'a, W>,
}

impl<'a, W: Worksheet + ?Sized> TableParser<'a, W> {
    pub fn new(sheet: &'a W, options: &'a ParseOptions) -> Self {
        TableParser {
            query: BorderQuery::new(sheet, options),
        }
    }

    /// Checks that the rectangle is enclosed by continuous borders on all four edges.
    pub fn validate_bordered_rectangle(&self, rectangle: &Rectangle) -> Result<(), NestedSheetError> {
        let (begin_row, end_row) = (rectangle.begin_row(), rectangle.end_row());
        let (begin_column, end_column) = (rectangle.begin_column(), rectangle.end_column());
        for row in [begin_row, end_row] {
            if !self.query.has_top_border(row, rectangle.columns())? {
                return Err(NestedSheetError::InvalidStructure(format!(
                    "Invalid rectangle {}, there is no top border from {} to {}",
                    rectangle,
                    index_to_reference(row, begin_column),
                    index_to_reference(row, end_column - 1)
                )));
            }
        }
        for column in [begin_column, end_column] {
            if !self.query.has_left_border(rectangle.rows(), column)? {
                return Err(NestedSheetError::InvalidStructure(format!(
                    "Invalid rectangle {}, there is no left border from {} to {}",
                    rectangle,
                    index_to_reference(begin_row, column),
                    index_to_reference(end_row - 1, column)
                )));
            }
        }
        Ok(())
    }

    /// Splits a bordered rectangle into logical rows.
    ///
    /// At least one interior top border must cross the full width, otherwise the
    /// rectangle does not hold several rows and is rejected.
    pub fn segment_rows(&self, rectangle: &Rectangle) -> Result<Vec<TableRow>, NestedSheetError> {
        self.validate_bordered_rectangle(rectangle)?;

        let mut boundaries = Vec::<usize>::new();
        for row in rectangle.begin_row() + 1..rectangle.end_row() {
            if self.query.has_top_border(row, rectangle.columns())? {
                boundaries.push(row);
            }
        }
        if boundaries.is_empty() {
            return Err(NestedSheetError::InvalidStructure(format!(
                "Invalid rectangle {}, no top border splits it into rows",
                rectangle
            )));
        }
        boundaries.push(rectangle.end_row());
        debug!(rectangle = %rectangle, rows = boundaries.len(), "Segmenting rows");

        let mut rows = Vec::with_capacity(boundaries.len());
        let mut band_begin = rectangle.begin_row();
        for boundary in boundaries {
            let band = Rectangle::from_bounds(band_begin, boundary, rectangle.begin_column(), rectangle.end_column())?;
            rows.push(self.segment_one_row(&band)?);
            band_begin = boundary;
        }
        Ok(rows)
    }

    /// Segments a rectangle holding exactly one logical row into its columns.
    pub fn segment_one_row(&self, rectangle: &Rectangle) -> Result<TableRow, NestedSheetError> {
        self.validate_bordered_rectangle(rectangle)?;
        let interior = rectangle.begin_row() + 1..rectangle.end_row();
        for row in interior.clone() {
            if self.query.has_top_border(row, rectangle.columns())? {
                return Err(NestedSheetError::InvalidStructure(format!(
                    "Invalid row {}, the top border at row {} crosses all its columns",
                    rectangle,
                    row + 1
                )));
            }
        }

        // Whether an interior row draws a top border over each column
        let mut split = Vec::<bool>::with_capacity(rectangle.columns().len());
        for column in rectangle.columns() {
            let mut flag = false;
            for row in interior.clone() {
                if self.query.has_top_border(row, [column])? {
                    flag = true;
                    break;
                }
            }
            split.push(flag);
        }
        let is_split = |column: usize| split[column - rectangle.begin_column()];

        let mut columns = Vec::<TableColumn>::new();
        let mut run_begin = rectangle.begin_column();
        for column in rectangle.begin_column() + 1..=rectangle.end_column() {
            if column < rectangle.end_column() && is_split(column) == is_split(run_begin) {
                continue;
            }
            let run = Rectangle::from_bounds(rectangle.begin_row(), rectangle.end_row(), run_begin, column)?;
            if is_split(run_begin) {
                trace!(run = %run, "Parent column");
                columns.push(TableColumn::parent(self.segment_rows(&run)?));
            } else {
                trace!(run = %run, "Leaf columns");
                columns.extend(self.segment_leaf_columns(&run)?);
            }
            run_begin = column;
        }
        Ok(TableRow::from_columns(columns))
    }

    /// Splits a rectangle without interior top borders into leaf columns at every
    /// left border running its full height.
    pub fn segment_leaf_columns(&self, rectangle: &Rectangle) -> Result<Vec<TableColumn>, NestedSheetError> {
        self.validate_bordered_rectangle(rectangle)?;
        for row in rectangle.begin_row() + 1..rectangle.end_row() {
            let bordered = self.query.columns_with_top_border(row, rectangle.columns())?;
            if let Some(column) = bordered.first() {
                return Err(NestedSheetError::InvalidStructure(format!(
                    "Invalid leaf columns {}, unexpected top border at {}",
                    rectangle,
                    index_to_reference(row, *column)
                )));
            }
        }

        let mut columns = Vec::<TableColumn>::new();
        let mut leaf_begin = rectangle.begin_column();
        for column in rectangle.begin_column() + 1..=rectangle.end_column() {
            if self.query.has_left_border(rectangle.rows(), column)? {
                let leaf = Rectangle::from_bounds(rectangle.begin_row(), rectangle.end_row(), leaf_begin, column)?;
                columns.push(self.extract_leaf(&leaf)?);
                leaf_begin = column;
            }
        }
        Ok(columns)
    }

    /// Collects the non-empty texts of a leaf rectangle in row-major order.
    pub fn extract_leaf(&self, rectangle: &Rectangle) -> Result<TableColumn, NestedSheetError> {
        self.validate_bordered_rectangle(rectangle)?;
        let mut values = Vec::<String>::new();
        for cell in rectangle.cells() {
            let text = self.query.cell_text(cell.row, cell.column)?;
            if !text.is_empty() {
                values.push(text);
            }
        }
        Ok(TableColumn::leaf(values))
    }
}

/// Segments a bordered rectangle of a sheet into a table tree.
pub fn segment_rows<W: Worksheet + ?Sized>(
    sheet: &W,
    rectangle: &Rectangle,
    options: &ParseOptions,
) -> Result<TableData, NestedSheetError> {
    let rows = TableParser::new(sheet, options).segment_rows(rectangle)?;
    Ok(TableData::from_rows(rows))
}

/// Parses the table described by `metadata` from its sheet
///
/// Every cell of the metadata rectangle must be present in the sheet.
///
/// # Arguments
/// * `sheet` - The table sheet, `None` if the workbook lacks it
/// * `metadata` - Metadata holding the data rectangle
/// * `options` - Sheet names, bounds and border threshold
pub fn parse_table<W: Worksheet + ?Sized>(
    sheet: Option<&W>,
    metadata: &TableMetadata,
    options: &ParseOptions,
) -> Result<TableData, NestedSheetError> {
    let sheet = sheet.ok_or_else(|| {
        NestedSheetError::InvalidArgument(format!("Unable to find {} sheet", options.table_sheet_name))
    })?;
    let rectangle = metadata.rectangle();
    for cell in rectangle.cells() {
        if sheet.cell(cell.row, cell.column).is_none() {
            return Err(NestedSheetError::InvalidArgument(format!(
                "Invalid table sheet, cell {} doesn't exist while metadata says the table spans {}",
                cell, rectangle
            )));
        }
    }

    let table = segment_rows(sheet, rectangle, options)
        .with_prefix(&format!("Parse table {} of sheet '{}'", rectangle, sheet.name()))?;
    debug!(
        table = %metadata.table_serial_number(),
        rows = table.rows().len(),
        depth = table.depth(),
        "Parsed table"
    );
    Ok(table)
}

/// Reads the metadata sheet and then the table it describes from a workbook.
pub fn parse_workbook(
    workbook: &mut XlsxWorkbook,
    options: &ParseOptions,
) -> Result<(TableMetadata, TableData), NestedSheetError> {
    let prefix = format!("Parse workbook '{}'", workbook.name());
    let sheet = workbook.read_sheet(&options.metadata_sheet_name).with_prefix(&prefix)?;
    let metadata = parse_metadata(sheet.as_ref(), options).with_prefix(&prefix)?;
    let sheet = workbook.read_sheet(&options.table_sheet_name).with_prefix(&prefix)?;
    let table = parse_table(sheet.as_ref(), &metadata, options).with_prefix(&prefix)?;
    Ok((metadata, table))
}
