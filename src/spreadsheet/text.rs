//! Normalization of one cell's content into a single text value.
//!
//! Superscript and subscript runs (footnote markers and the like) separate the
//! distinct values a cell holds; the marker text itself is dropped. Baseline runs
//! between two markers are trimmed and glued together, and the resulting segments
//! are joined with `,`.
use crate::error::NestedSheetError;
use crate::spreadsheet::cell::CellContent;
use crate::spreadsheet::cell::ScriptOffset;
use crate::spreadsheet::cell::TextRun;

/// Normalizes the content of one cell.
pub fn normalize_cell_text(content: &CellContent) -> Result<String, NestedSheetError> {
    match content {
        CellContent::Blank => Ok(String::new()),
        CellContent::Boolean(value) => Ok(value.to_string()),
        CellContent::Number(value) => Ok(format_number(*value)),
        CellContent::Text(runs) => normalize_runs(runs),
        other => Err(NestedSheetError::UnsupportedFormat(format!(
            "Cell kind '{}' is not supported",
            other.kind()
        ))),
    }
}

/// Integral values print without a fraction, others in the shortest float form.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

fn normalize_runs(runs: &[TextRun]) -> Result<String, NestedSheetError> {
    if runs.len() <= 1 {
        return Ok(runs.first().map(|run| run.text.trim().to_owned()).unwrap_or_default());
    }

    let mut segments = Vec::<String>::new();
    let mut buffer = String::new();
    for run in runs {
        match &run.offset {
            ScriptOffset::None => buffer.push_str(run.text.trim()),
            ScriptOffset::Superscript | ScriptOffset::Subscript => {
                if !buffer.is_empty() {
                    segments.push(std::mem::take(&mut buffer));
                }
            }
            ScriptOffset::Other(offset) => {
                return Err(NestedSheetError::UnsupportedFormat(format!(
                    "Unexpected script offset '{}' in text run '{}'",
                    offset, run.text
                )));
            }
        }
    }
    if !buffer.is_empty() {
        segments.push(buffer);
    }
    Ok(segments.join(","))
}
