//! Border queries over a worksheet.
//!
//! A top border between rows `row - 1` and `row` exists at a column when the lower
//! cell draws its top edge or the upper cell draws its bottom edge; row 0 always has
//! one. Left borders are the same rule transposed, column 0 always has one.
use crate::error::NestedSheetError;
use crate::error::ResultMessage;
use crate::options::ParseOptions;
use crate::spreadsheet::cell::BorderSide;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::text::normalize_cell_text;
use crate::spreadsheet::Worksheet;

/// Range-checked border and text lookups on one worksheet.
pub struct BorderQuery<'a, W: Worksheet + ?Sized> {
    sheet: &'a W,
    options: &'a ParseOptions,
}

impl<'a, W: Worksheet + ?Sized> BorderQuery<'a, W> {
    pub fn new(sheet: &'a W, options: &'a ParseOptions) -> Self {
        BorderQuery { sheet, options }
    }

    pub fn sheet(&self) -> &'a W {
        self.sheet
    }

    /// Rows up to one past the last row are addressable, the bottom edge of the sheet.
    fn check_row(&self, row: usize) -> Result<(), NestedSheetError> {
        let limit = self.sheet.last_row_index().map_or(0, |last| last + 1);
        if row > limit {
            return Err(NestedSheetError::InvalidArgument(format!(
                "Row {} is out of range, sheet '{}' ends at row {}",
                row,
                self.sheet.name(),
                limit
            )));
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> Result<(), NestedSheetError> {
        if column > self.options.max_column {
            return Err(NestedSheetError::InvalidArgument(format!(
                "Column {} is out of range, the maximum column is {}",
                column, self.options.max_column
            )));
        }
        Ok(())
    }

    fn is_visible(&self, row: usize, column: usize, side: BorderSide) -> bool {
        self.sheet
            .cell(row, column)
            .and_then(|cell| cell.border.side(side))
            .map(|line| line.is_visible(self.options.border_color_threshold))
            .unwrap_or(false)
    }

    /// Whether the cell draws a visible line on the given edge.
    pub fn has_visible_border(&self, row: usize, column: usize, side: BorderSide) -> Result<bool, NestedSheetError> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(self.is_visible(row, column, side))
    }

    /// Normalized text of the cell, empty for absent cells.
    pub fn cell_text(&self, row: usize, column: usize) -> Result<String, NestedSheetError> {
        self.check_row(row)?;
        self.check_column(column)?;
        match self.sheet.cell(row, column) {
            Some(cell) => normalize_cell_text(&cell.content).with_prefix(&format!("Cell {}", index_to_reference(row, column))),
            None => Ok(String::new()),
        }
    }

    fn top_border_at(&self, row: usize, column: usize) -> bool {
        row == 0 || self.is_visible(row, column, BorderSide::Top) || self.is_visible(row - 1, column, BorderSide::Bottom)
    }

    fn left_border_at(&self, row: usize, column: usize) -> bool {
        column == 0 || self.is_visible(row, column, BorderSide::Left) || self.is_visible(row, column - 1, BorderSide::Right)
    }

    /// The subset of `columns` that have a top border at `row`, in input order.
    pub fn columns_with_top_border<I>(&self, row: usize, columns: I) -> Result<Vec<usize>, NestedSheetError>
    where
        I: IntoIterator<Item = usize>,
    {
        let columns: Vec<usize> = columns.into_iter().collect();
        self.check_row(row)?;
        for &column in &columns {
            self.check_column(column)?;
        }
        Ok(columns.into_iter().filter(|&column| self.top_border_at(row, column)).collect())
    }

    /// Whether a top border at `row` runs continuously across every one of `columns`.
    pub fn has_top_border<I>(&self, row: usize, columns: I) -> Result<bool, NestedSheetError>
    where
        I: IntoIterator<Item = usize>,
    {
        let columns: Vec<usize> = columns.into_iter().collect();
        let bordered = self.columns_with_top_border(row, columns.iter().copied())?;
        Ok(bordered.len() == columns.len())
    }

    /// The subset of `rows` that have a left border at `column`, in input order.
    pub fn rows_with_left_border<I>(&self, rows: I, column: usize) -> Result<Vec<usize>, NestedSheetError>
    where
        I: IntoIterator<Item = usize>,
    {
        let rows: Vec<usize> = rows.into_iter().collect();
        self.check_column(column)?;
        for &row in &rows {
            self.check_row(row)?;
        }
        Ok(rows.into_iter().filter(|&row| self.left_border_at(row, column)).collect())
    }

    /// Whether a left border at `column` runs continuously across every one of `rows`.
    pub fn has_left_border<I>(&self, rows: I, column: usize) -> Result<bool, NestedSheetError>
    where
        I: IntoIterator<Item = usize>,
    {
        let rows: Vec<usize> = rows.into_iter().collect();
        let bordered = self.rows_with_left_border(rows.iter().copied(), column)?;
        Ok(bordered.len() == rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::BorderLine;
    use crate::spreadsheet::cell::CellContent;
    use crate::spreadsheet::reference::Rectangle;
    use crate::spreadsheet::GridSheet;

    fn rectangle(begin_row: usize, end_row: usize, begin_column: usize, end_column: usize) -> Rectangle {
        Rectangle::from_bounds(begin_row, end_row, begin_column, end_column).unwrap()
    }

    /// Two stacked boxes over columns 0..3 with a partial line under column 1 only.
    fn sheet() -> GridSheet {
        let mut sheet = GridSheet::new("Borders");
        sheet
            .draw_box(&rectangle(0, 2, 0, 3), &BorderLine::thin())
            .draw_box(&rectangle(2, 4, 0, 3), &BorderLine::thin());
        sheet.cell_mut(0, 1).border.bottom = Some(BorderLine::thin());
        sheet
    }

    #[test]
    fn top_border_from_own_top_or_upper_bottom() {
        let sheet = sheet();
        let options = ParseOptions::default();
        let query = BorderQuery::new(&sheet, &options);

        // Row 0 is always bordered, row 2 from box tops, row 4 from box bottoms
        assert!(query.has_top_border(0, 0..3).unwrap());
        assert!(query.has_top_border(2, 0..3).unwrap());
        assert!(query.has_top_border(4, 0..3).unwrap());

        assert_eq!(query.columns_with_top_border(1, 0..3).unwrap(), vec![1]);
        assert!(!query.has_top_border(1, 0..3).unwrap());
        assert!(query.has_top_border(1, [1]).unwrap());
        assert!(!query.has_top_border(3, 0..3).unwrap());
    }

    #[test]
    fn left_border_from_own_left_or_left_neighbor_right() {
        let sheet = sheet();
        let options = ParseOptions::default();
        let query = BorderQuery::new(&sheet, &options);

        assert!(query.has_left_border(0..4, 0).unwrap());
        assert!(query.has_left_border(0..4, 3).unwrap());
        assert!(!query.has_left_border(0..4, 1).unwrap());
        assert!(query.rows_with_left_border(0..4, 2).unwrap().is_empty());
    }

    #[test]
    fn near_white_borders_are_invisible() {
        let mut sheet = GridSheet::new("Colors");
        sheet.cell_mut(1, 0).border.top = Some(BorderLine::new("thin", Some([250, 251, 255])));
        sheet.cell_mut(1, 1).border.top = Some(BorderLine::new("thin", Some([249, 255, 255])));
        sheet.cell_mut(0, 2).border.bottom = Some(BorderLine::new("thin", None));
        sheet.cell_mut(1, 3).border.top = Some(BorderLine::new("none", Some([0, 0, 0])));
        let options = ParseOptions::default();
        let query = BorderQuery::new(&sheet, &options);

        assert_eq!(query.columns_with_top_border(1, 0..4).unwrap(), vec![1, 2]);
        assert!(!query.has_visible_border(1, 0, BorderSide::Top).unwrap());
        assert!(query.has_visible_border(1, 1, BorderSide::Top).unwrap());

        let strict = ParseOptions::default().with_border_color_threshold(251);
        let query = BorderQuery::new(&sheet, &strict);
        assert_eq!(query.columns_with_top_border(1, 0..4).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn out_of_range_lookups_fail() {
        let sheet = sheet();
        let options = ParseOptions::default().with_max_column(10);
        let query = BorderQuery::new(&sheet, &options);

        // Last row is 3, so row 4 is the bottom edge and row 5 is out of range
        assert!(query.has_top_border(4, [0]).is_ok());
        assert!(matches!(query.has_top_border(5, [0]), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(query.columns_with_top_border(1, [0, 11]), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(query.has_left_border([0], 11), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(query.rows_with_left_border([0, 9], 1), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(query.cell_text(0, 11), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(query.has_visible_border(6, 0, BorderSide::Top), Err(NestedSheetError::InvalidArgument(_))));
    }

    #[test]
    fn cell_text_normalizes_content() {
        let mut sheet = sheet();
        sheet
            .set_content(0, 0, CellContent::Number(123.0))
            .set_content(1, 1, CellContent::Formula("A1*2".to_owned()));
        let options = ParseOptions::default();
        let query = BorderQuery::new(&sheet, &options);

        assert_eq!(query.cell_text(0, 0).unwrap(), "123");
        assert_eq!(query.cell_text(0, 7).unwrap(), "");
        match query.cell_text(1, 1) {
            Err(NestedSheetError::UnsupportedFormat(message)) => assert!(message.starts_with("Cell B2")),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
