use crate::spreadsheet::cell::BorderLine;
use crate::spreadsheet::cell::BorderSide;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellContent;
use crate::spreadsheet::reference::Rectangle;
use crate::spreadsheet::Worksheet;
use std::collections::HashMap;

/// An in-memory worksheet holding sparse cells keyed by 0-based (row, column).
///
/// Loaded xlsx sheets end up here; tests and callers can also draw grids directly.
#[derive(Clone, Debug, Default)]
pub struct GridSheet {
    /// Sheet name
    name: String,
    /// Present cells, including styled cells without content
    cells: HashMap<(usize, usize), Cell>,
    /// Last row seen, counting rows declared without cells
    last_row: Option<usize>,
}

impl GridSheet {
    /// Creates an empty sheet.
    pub fn new(name: &str) -> Self {
        GridSheet {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    /// Returns the number of present cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the sheet contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Marks a row as present even if it has no cells.
    pub(crate) fn touch_row(&mut self, row: usize) {
        self.last_row = Some(self.last_row.map_or(row, |last| last.max(row)));
    }

    /// Stores a cell, replacing any previous one at the same position.
    pub fn push(&mut self, row: usize, column: usize, cell: Cell) -> &mut Self {
        self.touch_row(row);
        self.cells.insert((row, column), cell);
        self
    }

    /// Returns the cell at a position, creating a blank one if absent.
    pub fn cell_mut(&mut self, row: usize, column: usize) -> &mut Cell {
        self.touch_row(row);
        self.cells.entry((row, column)).or_default()
    }

    pub fn set_content(&mut self, row: usize, column: usize, content: CellContent) -> &mut Self {
        self.cell_mut(row, column).content = content;
        self
    }

    /// Places plain text in a cell, keeping its borders.
    pub fn set_text(&mut self, row: usize, column: usize, text: &str) -> &mut Self {
        self.set_content(row, column, CellContent::text(text))
    }

    /// Makes sure every cell of the rectangle is present.
    pub fn fill(&mut self, rectangle: &Rectangle) -> &mut Self {
        for cell in rectangle.cells() {
            self.cell_mut(cell.row, cell.column);
        }
        self
    }

    /// Draws the outline of a rectangle: top and bottom lines on its first and last rows,
    /// left and right lines on its first and last columns.
    pub fn draw_box(&mut self, rectangle: &Rectangle, line: &BorderLine) -> &mut Self {
        self.fill(rectangle);
        let last_row = rectangle.end_row() - 1;
        let last_column = rectangle.end_column() - 1;
        for column in rectangle.columns() {
            self.cell_mut(rectangle.begin_row(), column).border.set_side(BorderSide::Top, line.clone());
            self.cell_mut(last_row, column).border.set_side(BorderSide::Bottom, line.clone());
        }
        for row in rectangle.rows() {
            self.cell_mut(row, rectangle.begin_column()).border.set_side(BorderSide::Left, line.clone());
            self.cell_mut(row, last_column).border.set_side(BorderSide::Right, line.clone());
        }
        self
    }
}

impl Worksheet for GridSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn last_row_index(&self) -> Option<usize> {
        self.last_row
    }

    fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells.get(&(row, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_initial() {
        let sheet = GridSheet::new("Table");
        assert_eq!(sheet.name(), "Table");
        assert!(sheet.is_empty());
        assert_eq!(sheet.last_row_index(), None);
        assert!(sheet.cell(0, 0).is_none());
    }

    #[test]
    fn sheet_update() {
        let mut sheet = GridSheet::new("Table");
        sheet.set_text(1, 1, "a").set_text(3, 2, "b");
        sheet.touch_row(2);

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.last_row_index(), Some(3));
        assert_eq!(sheet.cell(3, 2).map(|cell| &cell.content), Some(&CellContent::text("b")));

        sheet.touch_row(7);
        assert_eq!(sheet.last_row_index(), Some(7));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn draw_box_outlines_rectangle() {
        let mut sheet = GridSheet::new("Table");
        let rectangle = Rectangle::from_bounds(1, 3, 1, 4).unwrap();
        sheet.draw_box(&rectangle, &BorderLine::thin());

        assert_eq!(sheet.len(), 6);
        let side = |row, column, side| sheet.cell(row, column).and_then(|cell| cell.border.side(side)).is_some();
        assert!(side(1, 1, BorderSide::Top) && side(1, 2, BorderSide::Top) && side(1, 3, BorderSide::Top));
        assert!(side(2, 1, BorderSide::Bottom) && side(2, 3, BorderSide::Bottom));
        assert!(side(1, 1, BorderSide::Left) && side(2, 1, BorderSide::Left));
        assert!(side(1, 3, BorderSide::Right) && side(2, 3, BorderSide::Right));
        assert!(!side(1, 2, BorderSide::Bottom));
        assert!(!side(2, 2, BorderSide::Top));
        assert!(!side(1, 2, BorderSide::Left));
    }

    #[test]
    fn set_text_keeps_borders() {
        let mut sheet = GridSheet::new("Table");
        let cell = Rectangle::from_bounds(0, 1, 0, 1).unwrap();
        sheet.draw_box(&cell, &BorderLine::thin()).set_text(0, 0, "x");
        let cell = sheet.cell(0, 0).unwrap();
        assert_eq!(cell.content, CellContent::text("x"));
        assert!(cell.border.top.is_some() && cell.border.right.is_some());
    }
}
