//! Cell references: `A1`-style names, zero-based coordinates and rectangles.
use crate::error::NestedSheetError;
use regex::Regex;
use std::fmt::Display;
use std::ops::Range;
use std::str::FromStr;

/// Converts a 0-based column index to its letter name (0 -> "A", 26 -> "AA").
pub(crate) fn col_to_name(col: usize) -> String {
    let mut column = col + 1;
    let mut name = String::new();
    while column > 0 {
        column -= 1;
        name.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    name
}

/// Converts 0-based row & column indexes to an Excel-style reference (e.g. "AB1001").
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", col_to_name(col), row + 1)
}

/// Converts column letters to a 0-based index, `None` on empty, non-letter or overflowing input.
pub(crate) fn col_to_index(name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    let mut column = 0usize;
    for letter in name.bytes() {
        if !letter.is_ascii_uppercase() {
            return None;
        }
        column = column.checked_mul(26)?.checked_add((letter - b'A' + 1) as usize)?;
    }
    Some(column - 1)
}

/// Converts a 1-based row number to a 0-based index, `None` for "0" or unparsable input.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number.parse::<usize>().ok()?.checked_sub(1)
}

/// Parses a reference such as "C12" into 0-based (row, column) indexes.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    Some((row_to_index(digits)?, col_to_index(letters)?))
}

/// Zero-based cell coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoordinate {
    pub row: usize,
    pub column: usize,
}

impl CellCoordinate {
    pub const fn new(row: usize, column: usize) -> Self {
        CellCoordinate { row, column }
    }

    /// Returns the Excel-style name of this cell (e.g. "A12").
    pub fn name(&self) -> String {
        index_to_reference(self.row, self.column)
    }
}

impl TryFrom<(i64, i64)> for CellCoordinate {
    type Error = NestedSheetError;

    /// Builds a coordinate from signed indexes, rejecting negative ones.
    fn try_from((row, column): (i64, i64)) -> Result<Self, Self::Error> {
        match (usize::try_from(row), usize::try_from(column)) {
            (Ok(row), Ok(column)) => Ok(CellCoordinate { row, column }),
            _ => Err(NestedSheetError::InvalidArgument(format!(
                "Cell coordinate ({}, {}) must not be negative",
                row, column
            ))),
        }
    }
}

impl FromStr for CellCoordinate {
    type Err = NestedSheetError;

    /// Parses an Excel cell name: A1 -> (0, 0), C12 -> (11, 2), AA70 -> (69, 26).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let pattern = Regex::new(r"^([A-Z]+)([0-9]+)$").expect("Hardcode regex pattern");
        let invalid = || NestedSheetError::InvalidArgument(format!("Unrecognizable Excel cell name '{}'", name));
        let captures = pattern.captures(name).ok_or_else(invalid)?;
        let column = col_to_index(&captures[1]).ok_or_else(invalid)?;
        let row = row_to_index(&captures[2]).ok_or_else(invalid)?;
        Ok(CellCoordinate { row, column })
    }
}

impl Display for CellCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A rectangular cell region given by its inclusive top-left and bottom-right corners.
///
/// The segmentation engine works on the derived half-open view
/// `[begin_row, end_row) x [begin_column, end_column)`, which is never empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    top_left: CellCoordinate,
    bottom_right: CellCoordinate,
}

impl Rectangle {
    /// Creates a rectangle; the top-left corner must be above-or-left of the bottom-right one.
    pub fn new(top_left: CellCoordinate, bottom_right: CellCoordinate) -> Result<Self, NestedSheetError> {
        if top_left.row > bottom_right.row || top_left.column > bottom_right.column {
            return Err(NestedSheetError::InvalidArgument(format!(
                "Invalid rectangle, top left {} is not above or left of bottom right {}",
                top_left, bottom_right
            )));
        }
        Ok(Rectangle { top_left, bottom_right })
    }

    /// Creates a rectangle from half-open row and column bounds.
    pub fn from_bounds(begin_row: usize, end_row: usize, begin_column: usize, end_column: usize) -> Result<Self, NestedSheetError> {
        if begin_row >= end_row || begin_column >= end_column {
            return Err(NestedSheetError::InvalidArgument(format!(
                "Invalid rectangle, rows [{}, {}) x columns [{}, {}) is empty",
                begin_row, end_row, begin_column, end_column
            )));
        }
        Ok(Rectangle {
            top_left: CellCoordinate::new(begin_row, begin_column),
            bottom_right: CellCoordinate::new(end_row - 1, end_column - 1),
        })
    }

    pub fn top_left(&self) -> CellCoordinate {
        self.top_left
    }

    pub fn bottom_right(&self) -> CellCoordinate {
        self.bottom_right
    }

    pub fn begin_row(&self) -> usize {
        self.top_left.row
    }

    pub fn end_row(&self) -> usize {
        self.bottom_right.row + 1
    }

    pub fn begin_column(&self) -> usize {
        self.top_left.column
    }

    pub fn end_column(&self) -> usize {
        self.bottom_right.column + 1
    }

    pub fn rows(&self) -> Range<usize> {
        self.begin_row()..self.end_row()
    }

    pub fn columns(&self) -> Range<usize> {
        self.begin_column()..self.end_column()
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoordinate> + '_ {
        self.rows()
            .flat_map(move |row| self.columns().map(move |column| CellCoordinate::new(row, column)))
    }
}

impl FromStr for Rectangle {
    type Err = NestedSheetError;

    /// Parses a range such as "A5:G48"; a single name denotes a one-cell rectangle.
    fn from_str(range: &str) -> Result<Self, Self::Err> {
        match range.split_once(':') {
            Some((top_left, bottom_right)) => Rectangle::new(top_left.trim().parse()?, bottom_right.trim().parse()?),
            None => {
                let cell: CellCoordinate = range.trim().parse()?;
                Rectangle::new(cell, cell)
            }
        }
    }
}

impl Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.top_left, self.bottom_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_names() {
        assert_eq!(CellCoordinate::new(0, 0).name(), "A1");
        assert_eq!(CellCoordinate::new(11, 0).name(), "A12");
        assert_eq!(CellCoordinate::new(98, 2).name(), "C99");
        assert_eq!(CellCoordinate::new(1000, 27).name(), "AB1001");
        assert_eq!(CellCoordinate::new(0, 25).to_string(), "Z1");
        assert_eq!(CellCoordinate::new(0, 26).to_string(), "AA1");
        assert_eq!(CellCoordinate::new(0, 701).to_string(), "ZZ1");
        assert_eq!(CellCoordinate::new(0, 702).to_string(), "AAA1");
    }

    #[test]
    fn parse_coordinate_names() {
        let a12: CellCoordinate = "A12".parse().unwrap();
        assert_eq!((a12.row, a12.column), (11, 0));
        let c99: CellCoordinate = "C99".parse().unwrap();
        assert_eq!((c99.row, c99.column), (98, 2));
        let ab1001: CellCoordinate = "AB1001".parse().unwrap();
        assert_eq!((ab1001.row, ab1001.column), (1000, 27));
        let aa70: CellCoordinate = "AA70".parse().unwrap();
        assert_eq!((aa70.row, aa70.column), (69, 26));
    }

    #[test]
    fn parse_invalid_coordinate_names() {
        for name in ["12A", "A", "12", "a1", "A0", "A1B", "", "A99999999999999999999999"] {
            assert!(
                matches!(name.parse::<CellCoordinate>(), Err(NestedSheetError::InvalidArgument(_))),
                "'{}' should be rejected",
                name
            );
        }
    }

    #[test]
    fn coordinate_name_round_trip() {
        for row in [0usize, 1, 9, 99, 1_048_575] {
            for column in [0usize, 1, 25, 26, 51, 52, 675, 676, 701, 702, 16_383] {
                let coordinate = CellCoordinate::new(row, column);
                let parsed: CellCoordinate = coordinate.name().parse().unwrap();
                assert_eq!(parsed, coordinate);
                assert_eq!(parsed.name(), coordinate.name());
            }
        }
    }

    #[test]
    fn negative_coordinates_are_rejected() {
        assert!(matches!(CellCoordinate::try_from((-1, 0)), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(CellCoordinate::try_from((0, -1)), Err(NestedSheetError::InvalidArgument(_))));
        assert_eq!(CellCoordinate::try_from((3, 4)).unwrap(), CellCoordinate::new(3, 4));
    }

    #[test]
    fn reference_helpers() {
        assert_eq!(reference_to_index("B3"), Some((2, 1)));
        assert_eq!(reference_to_index("XFD1048576"), Some((1_048_575, 16_383)));
        assert_eq!(reference_to_index("B0"), None);
        assert_eq!(reference_to_index("3"), None);
        assert_eq!(col_to_index(""), None);
        assert_eq!(row_to_index("0"), None);
    }

    #[test]
    fn rectangle_bounds() {
        let rectangle = Rectangle::new("A5".parse().unwrap(), "G48".parse().unwrap()).unwrap();
        assert_eq!(rectangle.begin_row(), 4);
        assert_eq!(rectangle.end_row(), 48);
        assert_eq!(rectangle.begin_column(), 0);
        assert_eq!(rectangle.end_column(), 7);
        assert_eq!(rectangle.to_string(), "A5:G48");
        assert_eq!("A5:G48".parse::<Rectangle>().unwrap(), rectangle);
        assert_eq!(Rectangle::from_bounds(4, 48, 0, 7).unwrap(), rectangle);
    }

    #[test]
    fn single_cell_rectangle() {
        let rectangle: Rectangle = "C3".parse().unwrap();
        assert_eq!(rectangle.rows(), 2..3);
        assert_eq!(rectangle.columns(), 2..3);
        assert_eq!(rectangle.cells().count(), 1);
    }

    #[test]
    fn invalid_rectangles() {
        let b2 = CellCoordinate::new(1, 1);
        assert!(matches!(Rectangle::new(b2, CellCoordinate::new(0, 1)), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(Rectangle::new(b2, CellCoordinate::new(1, 0)), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(Rectangle::from_bounds(3, 3, 0, 1), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!(Rectangle::from_bounds(0, 1, 2, 2), Err(NestedSheetError::InvalidArgument(_))));
        assert!(matches!("B2:A1".parse::<Rectangle>(), Err(NestedSheetError::InvalidArgument(_))));
    }

    #[test]
    fn cells_are_row_major() {
        let rectangle = Rectangle::from_bounds(1, 3, 4, 6).unwrap();
        let names: Vec<String> = rectangle.cells().map(|cell| cell.name()).collect();
        assert_eq!(names, vec!["E2", "F2", "E3", "F3"]);
    }
}
