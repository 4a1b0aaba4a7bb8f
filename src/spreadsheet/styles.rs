//! Cell border styles from the `xl/styles.xml` part.
use crate::error::NestedSheetError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::parse_rgb;
use crate::spreadsheet::cell::BorderLine;
use crate::spreadsheet::cell::BorderSide;
use crate::spreadsheet::cell::CellBorder;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::BufRead;
use zip::ZipArchive;

const TAG_BORDERS: QName = QName(b"borders");   // Border definitions container
const TAG_BORDER: QName = QName(b"border");     // Individual border definition
const TAG_COLOR: QName = QName(b"color");       // Color of one border edge
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs"); // Cell formats referenced by `c@s`
const TAG_FORMAT_INDEX: QName = QName(b"xf");        // Individual cell format

/// Maps a border edge element to its side; `start`/`end` are the bidi spellings.
fn border_side(name: QName) -> Option<BorderSide> {
    match name.as_ref() {
        b"left" | b"start" => Some(BorderSide::Left),
        b"right" | b"end" => Some(BorderSide::Right),
        b"top" => Some(BorderSide::Top),
        b"bottom" => Some(BorderSide::Bottom),
        _ => None,
    }
}

/// Loads the borders of every cell format, indexed like the `s` attribute of cells
///
/// # Arguments
/// * `zip` - ZIP archive containing the xlsx package
///
/// # Returns
/// Vector of borders indexed by cell format ID; empty if the package has no styles
pub(crate) fn load_cell_borders(zip: &mut ZipArchive<UnifiedReader>) -> Result<Vec<CellBorder>, NestedSheetError> {
    match zip.xml_reader("xl/styles.xml")? {
        Some(mut reader) => read_cell_borders(&mut reader),
        None => Ok(Vec::new()),
    }
}

fn read_cell_borders<R: BufRead>(reader: &mut XmlReader<R>) -> Result<Vec<CellBorder>, NestedSheetError> {
    let mut borders = Vec::<CellBorder>::new();
    let mut borders_context = false;
    let mut border: Option<CellBorder> = None;
    let mut line: Option<(BorderSide, BorderLine)> = None;

    let mut format_indexes_context = false;
    let mut border_ids = Vec::<usize>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_BORDERS => borders_context = true,
        Event::End(event) if event.name() == TAG_BORDERS => borders_context = false,
        Event::Start(event) if borders_context && event.name() == TAG_BORDER => border = Some(CellBorder::default()),
        Event::End(event) if borders_context && event.name() == TAG_BORDER => {
            if let Some(border) = border.take() {
                borders.push(border);
            }
        }
        Event::Start(event) if border.is_some() && border_side(event.name()).is_some() => {
            // An edge without a style attribute draws nothing
            line = match (border_side(event.name()), event.get_attribute_value("style")?) {
                (Some(side), Some(style)) => Some((side, BorderLine::new(&style, None))),
                _ => None,
            };
        }
        Event::Start(event) if event.name() == TAG_COLOR => {
            if let Some((_, line)) = line.as_mut() {
                line.color = event.get_attribute_value("rgb")?.and_then(|rgb| parse_rgb(&rgb));
            }
        }
        Event::End(event) if line.is_some() && border_side(event.name()).is_some() => {
            if let (Some(border), Some((side, line))) = (border.as_mut(), line.take()) {
                border.set_side(side, line);
            }
        }

        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = false,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            border_ids.push(event.parse_attribute_value::<usize>("borderId")?.unwrap_or(0));
        }
    });

    Ok(border_ids
        .into_iter()
        .map(|id| borders.get(id).cloned().unwrap_or_default())
        .collect())
}
