use thiserror::Error;

/// Main error type for the nested sheet parser.
/// Aggregates the structural error kinds raised by the parser together with errors from
/// the standard library, dependencies and the xlsx access layer.
#[derive(Error, Debug)]
pub enum NestedSheetError {
    /// Malformed coordinate, cell name, rectangle or out-of-range lookup.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The grid does not encode a well-formed nested table at the requested rectangle.
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// A cell's content or styling cannot be normalized.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, NestedSheetError> {
    /// Prefixes the error message; the three parser error kinds keep their variant.
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| match e {
            NestedSheetError::InvalidArgument(m) => NestedSheetError::InvalidArgument(format!("{}: {}", message, m)),
            NestedSheetError::InvalidStructure(m) => NestedSheetError::InvalidStructure(format!("{}: {}", message, m)),
            NestedSheetError::UnsupportedFormat(m) => NestedSheetError::UnsupportedFormat(format!("{}: {}", message, m)),
            e => NestedSheetError::WithContextError(format!("{}: {}", message, e)),
        })
    }
}
