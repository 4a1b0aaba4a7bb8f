//! Part lookup inside the zip container of an xlsx package

use crate::error::NestedSheetError;
use crate::helpers::xml::XmlReader;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use zip::read::ZipFile;
use zip::ZipArchive;

pub(crate) trait ZipHelper<RS: Read + Seek> {
    /// Stored name of a part, matched ignoring ASCII case and reading `\` as `/`
    fn part_name(&self, name: &str) -> Option<String>;

    /// XML reader over a part, `None` if the package lacks it
    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, NestedSheetError>;
}

impl<RS: Read + Seek> ZipHelper<RS> for ZipArchive<RS> {
    fn part_name(&self, name: &str) -> Option<String> {
        let wanted = name.replace('\\', "/");
        let wanted = wanted.trim_start_matches('/');
        self.file_names()
            .find(|stored| stored.eq_ignore_ascii_case(wanted))
            .map(str::to_owned)
    }

    fn xml_reader(
        &'_ mut self,
        name: &str,
    ) -> Result<Option<XmlReader<BufReader<ZipFile<'_, RS>>>>, NestedSheetError> {
        match self.part_name(name) {
            Some(part) => {
                let file = self.by_name(&part)?;
                Ok(Some(XmlReader::new(BufReader::new(file))))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive() -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("xl/workbook.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"<workbook/>").unwrap();
        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn part_names_ignore_case_and_separator() {
        let zip = archive();
        assert_eq!(zip.part_name("XL\\Workbook.xml").as_deref(), Some("xl/workbook.xml"));
        assert_eq!(zip.part_name("/xl/workbook.xml").as_deref(), Some("xl/workbook.xml"));
        assert_eq!(zip.part_name("xl/styles.xml"), None);
    }

    #[test]
    fn xml_reader_for_missing_part_is_none() {
        let mut zip = archive();
        assert!(zip.xml_reader("xl/sharedStrings.xml").unwrap().is_none());
        assert!(zip.xml_reader("xl/workbook.xml").unwrap().is_some());
    }
}
