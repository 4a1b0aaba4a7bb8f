//! quick-xml plumbing for the SpreadsheetML parts of an xlsx package

use crate::error::NestedSheetError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesCData;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while decoding XML content
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Unknown XML entity '&{0};'")]
    ParseEntityError(String),

    #[error("Attribute {0}=\"{1}\" has an unexpected value")]
    ParseAttributeValueError(String, String),
}

/// Event reader over one package part, reusing a single buffer
///
/// Self-closing elements are reported as a start and an end event, so `<c r="A1"/>`
/// and `<c r="A1"></c>` read the same.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(source: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = false;
        config.check_comments = false;
        config.trim_text(false);
        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// Next event, `None` once the part is exhausted
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, NestedSheetError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer)? {
            Event::Eof => Ok(None),
            event => Ok(Some(event)),
        }
    }
}

pub(crate) trait XmlAttributeHelper<'a> {
    /// Unescaped attribute value
    fn get_value(&self) -> Result<Cow<'a, str>, NestedSheetError>;
}

impl<'a> XmlAttributeHelper<'a> for Attribute<'a> {
    fn get_value(&self) -> Result<Cow<'a, str>, NestedSheetError> {
        Ok(self.unescape_value()?)
    }
}

/// Attribute lookups on start tags
pub(crate) trait XmlNodeHelper<'a> {
    /// Unescaped value of the named attribute, `None` if the tag lacks it
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, NestedSheetError>;

    /// Named attribute parsed as `T`, such as the `borderId` of an `<xf>`
    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, NestedSheetError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, NestedSheetError> {
        self.try_get_attribute(name)?
            .map(|attribute| attribute.get_value())
            .transpose()
    }

    fn parse_attribute_value<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, NestedSheetError> {
        match self.get_attribute_value(name)? {
            Some(value) => match value.parse::<T>() {
                Ok(parsed) => Ok(Some(parsed)),
                Err(_) => Err(XmlError::ParseAttributeValueError(name.to_owned(), value.into_owned()))?,
            },
            None => Ok(None),
        }
    }
}

/// Accumulates the character data of an element
pub(crate) trait XmlTextBuffer {
    fn push_text(&mut self, text: &BytesText) -> Result<(), NestedSheetError>;

    fn push_cdata(&mut self, cdata: &BytesCData) -> Result<(), NestedSheetError>;

    /// Appends a character reference (`&#65;`, `&#x41;`) or a predefined entity (`&amp;`)
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), NestedSheetError>;
}

impl XmlTextBuffer for String {
    fn push_text(&mut self, text: &BytesText) -> Result<(), NestedSheetError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_cdata(&mut self, cdata: &BytesCData) -> Result<(), NestedSheetError> {
        self.push_str(&cdata.xml_content()?);
        Ok(())
    }

    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), NestedSheetError> {
        let name = reference.xml_content()?;
        let character = match name.strip_prefix('#') {
            Some(number) => {
                let code = match number.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16)?,
                    None => number.parse::<u32>()?,
                };
                std::char::from_u32(code)
            }
            None => None,
        };
        match (character, resolve_xml_entity(&name)) {
            (Some(character), _) => self.push(character),
            (None, Some(entity)) => self.push_str(entity),
            // Surrogates and other invalid code points are dropped
            (None, None) if name.starts_with('#') => (),
            (None, None) => Err(XmlError::ParseEntityError(name.into_owned()))?,
        }
        Ok(())
    }
}

/// Loops over the events of an [`XmlReader`], dispatching to the given match arms
/// and ignoring every other event.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(event) = $reader.next()? {
            match event {
                $($arms)*
                _ => (),
            }
        }
    };
}
