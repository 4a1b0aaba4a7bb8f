//! # Table Tree Module
//!
//! The logical table recovered from a bordered grid: rows of columns, where each
//! column is empty, a leaf holding cell values, or a parent split into nested rows.
pub mod border;
pub mod parser;

/// One logical column of a [`TableRow`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableColumn {
    /// No content
    Empty,
    /// Non-empty values in reading order, one per non-empty physical cell
    Leaf(Vec<String>),
    /// Non-empty list of nested logical rows
    Parent(Vec<TableRow>),
}

impl TableColumn {
    pub fn empty() -> Self {
        TableColumn::Empty
    }

    /// Creates a leaf column; no values collapse to [`TableColumn::Empty`].
    pub fn leaf<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            TableColumn::Empty
        } else {
            TableColumn::Leaf(values)
        }
    }

    /// Creates a parent column; no rows collapse to [`TableColumn::Empty`].
    pub fn parent(rows: Vec<TableRow>) -> Self {
        if rows.is_empty() {
            TableColumn::Empty
        } else {
            TableColumn::Parent(rows)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TableColumn::Empty)
    }

    /// Leaf values, `None` for empty and parent columns.
    pub fn values(&self) -> Option<&[String]> {
        match self {
            TableColumn::Leaf(values) => Some(values),
            TableColumn::Empty | TableColumn::Parent(_) => None,
        }
    }

    /// Nested rows, `None` for empty and leaf columns.
    pub fn rows(&self) -> Option<&[TableRow]> {
        match self {
            TableColumn::Parent(rows) => Some(rows),
            TableColumn::Empty | TableColumn::Leaf(_) => None,
        }
    }

    /// Nesting depth below this column: 0 for empty and leaf columns.
    pub fn depth(&self) -> usize {
        match self {
            TableColumn::Empty | TableColumn::Leaf(_) => 0,
            TableColumn::Parent(rows) => 1 + rows.iter().map(TableRow::depth).max().unwrap_or(0),
        }
    }
}

/// A logical row: its columns in left-to-right order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    columns: Vec<TableColumn>,
}

impl TableRow {
    pub fn from_columns(columns: Vec<TableColumn>) -> Self {
        TableRow { columns }
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn depth(&self) -> usize {
        self.columns.iter().map(TableColumn::depth).max().unwrap_or(0)
    }
}

/// The recovered table: its logical rows in top-to-bottom order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableData {
    rows: Vec<TableRow>,
}

impl TableData {
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        TableData { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TableRow> {
        self.rows
    }

    /// Deepest nesting of parent columns anywhere in the table.
    pub fn depth(&self) -> usize {
        self.rows.iter().map(TableRow::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_collapse() {
        assert_eq!(TableColumn::leaf(Vec::<String>::new()), TableColumn::Empty);
        assert_eq!(TableColumn::parent(Vec::new()), TableColumn::Empty);
        assert!(TableColumn::empty().is_empty());
        assert_eq!(TableColumn::leaf(["40"]), TableColumn::Leaf(vec!["40".to_owned()]));
    }

    #[test]
    fn accessors() {
        let leaf = TableColumn::leaf(["a", "b"]);
        assert_eq!(leaf.values(), Some(&["a".to_owned(), "b".to_owned()][..]));
        assert!(leaf.rows().is_none());

        let parent = TableColumn::parent(vec![TableRow::from_columns(vec![leaf.clone()])]);
        assert!(parent.values().is_none());
        assert_eq!(parent.rows().map(|rows| rows.len()), Some(1));
    }

    #[test]
    fn depth_follows_nesting() {
        let inner = TableRow::from_columns(vec![TableColumn::leaf(["20"]), TableColumn::empty()]);
        let middle = TableRow::from_columns(vec![TableColumn::parent(vec![inner]), TableColumn::leaf(["120"])]);
        let outer = TableRow::from_columns(vec![TableColumn::leaf(["DC"]), TableColumn::parent(vec![middle])]);
        let flat = TableRow::from_columns(vec![TableColumn::leaf(["x"])]);
        let table = TableData::from_rows(vec![flat, outer]);
        assert_eq!(table.depth(), 2);
        assert_eq!(table.rows()[0].depth(), 0);
        assert_eq!(table.into_rows().len(), 2);
    }
}
