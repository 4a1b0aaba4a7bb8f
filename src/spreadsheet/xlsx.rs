use crate::error::NestedSheetError;
use crate::error::ResultMessage;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextBuffer;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellBorder;
use crate::spreadsheet::cell::CellContent;
use crate::spreadsheet::cell::ScriptOffset;
use crate::spreadsheet::cell::TextRun;
use crate::spreadsheet::excel::load_worksheet_targets;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::GridSheet;
use crate::spreadsheet::styles::load_cell_borders;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::Worksheet;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

// XML tag names for parsing SpreadsheetML parts
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_RICH_TEXT_RUN: QName = QName(b"r");         // Formatting run of rich text
const TAG_VERTICAL_ALIGN: QName = QName(b"vertAlign"); // Script offset of a run
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_FORMULA: QName = QName(b"f");               // Cell formula
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// An Excel xlsx workbook opened for reading
///
/// Shared strings and border styles are loaded once when the workbook is opened;
/// worksheets are parsed on demand into [`GridSheet`]s.
pub struct XlsxWorkbook {
    /// File name of the workbook
    name: String,
    /// ZIP archive containing the package parts
    zip: ZipArchive<UnifiedReader>,
    /// Cell borders indexed by cell format ID
    borders: Vec<CellBorder>,
    /// Shared string table with formatting runs
    shared_strings: Vec<Vec<TextRun>>,
    /// List of worksheets with (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl XlsxWorkbook {
    /// Opens an xlsx file from the local file system
    ///
    /// # Arguments
    /// * `path` - Path to the xlsx file
    ///
    /// # Returns
    /// The opened workbook, or an error if the package is unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Result<XlsxWorkbook, NestedSheetError> {
        let name = path.as_ref().display().to_string();
        let prefix = format!("Open workbook '{}'", name);
        let reader = UnifiedReader::open(&path).with_prefix(&prefix)?;
        Self::load(name, reader).with_prefix(&prefix)
    }

    /// Opens an xlsx package already held in memory
    ///
    /// # Arguments
    /// * `name` - Name used for the workbook in messages
    /// * `bytes` - Content of the xlsx file
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<XlsxWorkbook, NestedSheetError> {
        Self::load(name.to_owned(), UnifiedReader::from_bytes(bytes))
            .with_prefix(&format!("Open workbook '{}'", name))
    }

    fn load(name: String, reader: UnifiedReader) -> Result<XlsxWorkbook, NestedSheetError> {
        let mut zip = ZipArchive::new(reader)?;
        let sheets = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?;
        }
        let borders = load_cell_borders(&mut zip)?;
        let shared_strings = load_shared_strings(&mut zip)?;
        debug!(
            workbook = %name,
            sheets = sheets.len(),
            cell_formats = borders.len(),
            shared_strings = shared_strings.len(),
            "Opened xlsx workbook"
        );
        Ok(XlsxWorkbook {
            name,
            zip,
            borders,
            shared_strings,
            sheets,
        })
    }

    /// Returns the file name of this workbook
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the worksheets in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Reads one worksheet into memory
    ///
    /// Sheet names match case-insensitively.
    ///
    /// # Arguments
    /// * `name` - Name of the worksheet
    ///
    /// # Returns
    /// The loaded sheet, or `None` if the workbook has no sheet with that name
    pub fn read_sheet(&mut self, name: &str) -> Result<Option<GridSheet>, NestedSheetError> {
        let (sheet_name, zip_path) = match self.sheets.iter().find(|(sheet_name, _)| sheet_name.eq_ignore_ascii_case(name)) {
            Some((sheet_name, zip_path)) => (sheet_name.to_owned(), zip_path.to_owned()),
            None => return Ok(None),
        };
        let prefix = format!("Read sheet '{}' of '{}'", sheet_name, self.name);
        let mut reader = self.zip.xml_reader(&zip_path)
            .with_prefix(&prefix)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        let sheet = read_worksheet(&mut reader, &sheet_name, &self.borders, &self.shared_strings).with_prefix(&prefix)?;
        debug!(
            sheet = %sheet_name,
            cells = sheet.len(),
            last_row = ?sheet.last_row_index(),
            "Loaded worksheet"
        );
        Ok(Some(sheet))
    }
}

/// Loads the worksheet list from `xl/workbook.xml`
///
/// # Returns
/// Worksheets as (name, zip_path) pairs in workbook order
fn load_workbook(zip: &mut ZipArchive<UnifiedReader>) -> Result<Vec<(String, String)>, NestedSheetError> {
    let relationships = load_worksheet_targets(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&*id) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Loads the shared string table, keeping the formatting runs of rich text items
fn load_shared_strings(zip: &mut ZipArchive<UnifiedReader>) -> Result<Vec<Vec<TextRun>>, NestedSheetError> {
    let mut shared_strings = Vec::<Vec<TextRun>>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string_runs(&mut reader, TAG_SHARED_STRING_ITEM)?);
        }
    });
    Ok(shared_strings)
}

/// Reads the formatting runs of a string item up to `end_tag`
///
/// Plain items (`<t>` without `<r>`) come back as one run; phonetic annotations are skipped.
fn read_string_runs<R: BufRead>(reader: &mut XmlReader<R>, end_tag: QName) -> Result<Vec<TextRun>, NestedSheetError> {
    let mut runs = Vec::<TextRun>::new();
    let mut is_phonetic_text = false;
    let mut is_text = false;
    let mut offset = ScriptOffset::None;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_RICH_TEXT_RUN => {
            offset = ScriptOffset::None;
            text.clear();
        }
        Event::End(event) if !is_phonetic_text && event.name() == TAG_RICH_TEXT_RUN => {
            runs.push(TextRun {
                text: std::mem::take(&mut text),
                offset: std::mem::take(&mut offset),
            });
        }
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_VERTICAL_ALIGN => {
            offset = event.get_attribute_value("val")?
                .map(|value| ScriptOffset::parse(&value))
                .unwrap_or_default();
        }
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_text(&event)?,
        Event::CData(event) if is_text => text.push_cdata(&event)?,
        Event::GeneralRef(event) if is_text => text.push_reference(&event)?,
    });
    if runs.is_empty() || !text.is_empty() {
        runs.push(TextRun::plain(&text));
    }
    Ok(runs)
}

/// Reads the text content of a simple element such as `<v>` or `<f>`
fn read_text<R: BufRead>(reader: &mut XmlReader<R>, end_tag: QName) -> Result<String, NestedSheetError> {
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Text(event) => text.push_text(&event)?,
        Event::CData(event) => text.push_cdata(&event)?,
        Event::GeneralRef(event) => text.push_reference(&event)?,
    });
    Ok(text)
}

/// Raw pieces of one `<c>` element collected while reading it
#[derive(Default)]
struct RawCell {
    kind: Option<String>,
    style: usize,
    value: Option<String>,
    formula: Option<String>,
    runs: Option<Vec<TextRun>>,
}

impl RawCell {
    /// Resolves the cell type and value into content; a formula wins over its cached value
    fn into_content(self, shared_strings: &[Vec<TextRun>]) -> Result<CellContent, NestedSheetError> {
        if let Some(formula) = self.formula {
            return Ok(CellContent::Formula(formula));
        }
        let value = self.value.filter(|value| !value.is_empty());
        let content = match self.kind.as_deref().unwrap_or("n") {
            "s" => match value {
                Some(value) => {
                    let index = value.trim().parse::<usize>()?;
                    let runs = shared_strings.get(index).ok_or_else(|| {
                        NestedSheetError::UnsupportedFormat(format!("Shared string {} does not exist", index))
                    })?;
                    CellContent::Text(runs.to_owned())
                }
                None => CellContent::Blank,
            },
            "inlineStr" => self.runs.map(CellContent::Text).unwrap_or_default(),
            "str" | "d" => value.map(|value| CellContent::text(&value)).unwrap_or_default(),
            "b" => value
                .map(|value| CellContent::Boolean(value == "1" || value.eq_ignore_ascii_case("true")))
                .unwrap_or_default(),
            "e" => value.map(CellContent::Error).unwrap_or_default(),
            "n" | "" => match value {
                Some(value) => CellContent::Number(value.trim().parse::<f64>().map_err(|_| {
                    NestedSheetError::UnsupportedFormat(format!("Invalid number '{}'", value))
                })?),
                None => CellContent::Blank,
            },
            other => Err(NestedSheetError::UnsupportedFormat(format!("Unknown cell type '{}'", other)))?,
        };
        Ok(content)
    }
}

/// Reads every `<c>` element of a worksheet part, empty styled cells included
fn read_worksheet<R: BufRead>(
    reader: &mut XmlReader<R>,
    name: &str,
    borders: &[CellBorder],
    shared_strings: &[Vec<TextRun>],
) -> Result<GridSheet, NestedSheetError> {
    let mut sheet = GridSheet::new(name);
    let mut row_count = 0usize;
    let mut col_count = 0usize;
    let mut row = 0usize;
    let mut col = 0usize;
    let mut cell = RawCell::default();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_ROW => {
            row = event.parse_attribute_value::<usize>("r")?
                .and_then(|index| index.checked_sub(1))
                .unwrap_or(row_count);
            col_count = 0;
            sheet.touch_row(row);
        }
        Event::End(event) if event.name() == TAG_ROW => row_count = row + 1,
        Event::Start(event) if event.name() == TAG_CELL => {
            (row, col) = event.get_attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((row, col_count));
            col_count = col + 1;
            cell = RawCell {
                kind: event.get_attribute_value("t")?.map(|kind| kind.to_string()),
                style: event.parse_attribute_value::<usize>("s")?.unwrap_or(0),
                ..Default::default()
            };
        }
        Event::Start(event) if event.name() == TAG_VALUE => cell.value = Some(read_text(reader, TAG_VALUE)?),
        Event::Start(event) if event.name() == TAG_FORMULA => cell.formula = Some(read_text(reader, TAG_FORMULA)?),
        Event::Start(event) if event.name() == TAG_INLINE_STRING => cell.runs = Some(read_string_runs(reader, TAG_INLINE_STRING)?),
        Event::End(event) if event.name() == TAG_CELL => {
            let raw = std::mem::take(&mut cell);
            let border = borders.get(raw.style).cloned().unwrap_or_default();
            let content = raw.into_content(shared_strings)
                .with_prefix(&format!("Cell {}", index_to_reference(row, col)))?;
            sheet.push(row, col, Cell { content, border });
        }
    });
    Ok(sheet)
}
