//! XML parsing utilities for the OOXML parts of a workbook
//! Provides an XML reader wrapper and helper traits for attribute and text processing

use crate::error::RetroError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use thiserror::Error;

/// Errors specific to XML parsing operations
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Parse entity '{0}' failed")]
    ParseEntityError(String),
}

/// XML reader wrapper configured for worksheet parts
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(buf_reader: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(buf_reader);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        // `<c r="A1"/>` must still produce a Start/End pair
        config.expand_empty_elements = true;
        config.trim_text(false);

        let buffer = Vec::with_capacity(1024);
        XmlReader { reader, buffer }
    }

    /// Reads the next XML event, `None` at end of document
    pub(crate) fn next(&'_ mut self) -> Result<Option<Event<'_>>, RetroError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer) {
            Ok(Event::Eof) => Ok(None),
            Ok(event) => Ok(Some(event)),
            Err(error) => Err(RetroError::XmlError(error)),
        }
    }
}

/// Attribute lookup on start tags
pub(crate) trait XmlNodeHelper<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, RetroError>;
}

impl<'a> XmlNodeHelper<'a> for BytesStart<'a> {
    fn get_attribute_value(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, RetroError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?)),
            None => Ok(None),
        }
    }
}

/// Building text content out of XML events
pub(crate) trait XmlTextContextHelper {
    /// Appends an entity or character reference (`&amp;`, `&#10;`, `&#x41;`)
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), RetroError>;
}

impl XmlTextContextHelper for String {
    fn push_bytes_ref(&mut self, bytes: &BytesRef) -> Result<(), RetroError> {
        let raw = bytes.xml_content()?;
        push_reference(self, &raw)
    }
}

fn push_reference(text: &mut String, raw: &str) -> Result<(), RetroError> {
    if let Some(number) = raw.strip_prefix('#') {
        let code = if let Some(hex) = number.strip_prefix('x') {
            u32::from_str_radix(hex, 16)?
        } else {
            number.parse::<u32>()?
        };
        if let Some(character) = std::char::from_u32(code) {
            text.push(character);
        }
    } else if let Some(entity) = resolve_xml_entity(raw) {
        text.push_str(entity);
    } else {
        Err(XmlError::ParseEntityError(raw.to_string()))?;
    }
    Ok(())
}

#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(result) = $reader.next()? {
            match result {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}
