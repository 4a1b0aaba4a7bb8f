//! Open Packaging Conventions helpers for xlsx packages
use crate::error::NestedSheetError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::collections::HashMap;
use zip::ZipArchive;

/// Local name of a relationship element
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Relationship types of worksheets end with this; chartsheets and dialog sheets hold no cells
const WORKSHEET_TYPE_SUFFIX: &str = "/worksheet";

/// Loads the worksheet targets of a relationships part
///
/// # Arguments
/// * `zip` - Zip archive handle
/// * `path` - Path of the `.rels` part within the archive
///
/// # Returns
/// Mapping of relationship IDs to worksheet part paths
pub(super) fn load_worksheet_targets(zip: &mut ZipArchive<UnifiedReader>, path: &str) -> Result<HashMap<String, String>, NestedSheetError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_owned()))?;
    let mut targets = HashMap::<String, String>::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let is_worksheet = event.get_attribute_value("Type")?
                .map_or(true, |kind| kind.ends_with(WORKSHEET_TYPE_SUFFIX));
            if is_worksheet {
                if let (Some(id), Some(target)) = (event.get_attribute_value("Id")?, event.get_attribute_value("Target")?) {
                    targets.insert(id.into_owned(), resolve_target(&target));
                }
            }
        }
    });
    Ok(targets)
}

/// Resolves a workbook relationship target to a part path
///
/// Targets are relative to `xl/` unless they start with `/`; `.` and `..` segments
/// are folded. Some writers emit `xl/...` without the leading slash, which is taken
/// as already rooted.
pub(crate) fn resolve_target(target: &str) -> String {
    let rooted = target.starts_with('/') || target.starts_with("xl/");
    let mut segments: Vec<&str> = if rooted { Vec::new() } else { vec!["xl"] };
    for segment in target.split('/') {
        match segment {
            "" | "." => (),
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_targets() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("xl/worksheets/sheet3.xml"), "xl/worksheets/sheet3.xml");
        assert_eq!(resolve_target("./worksheets/sheet4.xml"), "xl/worksheets/sheet4.xml");
        assert_eq!(resolve_target("../xl/worksheets/sheet5.xml"), "xl/worksheets/sheet5.xml");
    }
}
