/// Options controlling where the table lives in a workbook and how borders are judged.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    /// Name of the sheet holding the bordered table grid.
    pub table_sheet_name: String,

    /// Name of the sheet holding the key/value metadata.
    pub metadata_sheet_name: String,

    /// Number of columns scanned per metadata row.
    pub metadata_max_column: usize,

    /// Upper bound (inclusive) accepted for column indexes in border and text lookups.
    pub max_column: usize,

    /// A border whose RGB bytes are all at or above this value is near-white and invisible.
    pub border_color_threshold: u8,
}

impl ParseOptions {
    /// Number of columns in an Excel 2007+ worksheet.
    pub const DEFAULT_MAX_COLUMN: usize = 16_384;

    pub fn with_table_sheet_name(mut self, name: &str) -> Self {
        self.table_sheet_name = name.to_owned();
        self
    }

    pub fn with_metadata_sheet_name(mut self, name: &str) -> Self {
        self.metadata_sheet_name = name.to_owned();
        self
    }

    pub fn with_max_column(mut self, max_column: usize) -> Self {
        self.max_column = max_column;
        self
    }

    pub fn with_border_color_threshold(mut self, threshold: u8) -> Self {
        self.border_color_threshold = threshold;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            table_sheet_name: "Table".to_owned(),
            metadata_sheet_name: "Metadata".to_owned(),
            metadata_max_column: 20,
            max_column: Self::DEFAULT_MAX_COLUMN,
            border_color_threshold: 250,
        }
    }
}
