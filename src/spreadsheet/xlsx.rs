use crate::error::RetroError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::reader::WorkbookSource;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::reference::row_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::HashSet;
use std::io::BufReader;
use zip::read::ZipFile;
use zip::ZipArchive;

// XML tag names of the xlsx package parts
const TAG_RELATIONSHIP: &[u8] = b"Relationship";       // Entry in a .rels part
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");   // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// An xlsx workbook opened from a path or an uploaded buffer
pub(crate) struct XlsxSpreadsheet {
    /// Display name of the workbook
    pub(crate) name: String,
    /// ZIP archive containing the package parts
    zip: ZipArchive<UnifiedReader>,
    /// Cell types indexed by style id, for date detection
    number_formats: Vec<CellType>,
    /// Worksheets as (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    /// Opens the package and parses workbook structure and styles.
    pub(crate) fn open(source: &WorkbookSource) -> Result<XlsxSpreadsheet, RetroError> {
        let name = source.name();
        let mut reader = UnifiedReader::new(source)?;

        // Encrypted packages are wrapped in a compound file instead of a zip
        if reader.is_compound_file()? {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(name.to_owned()))?;
        }

        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }

        let number_formats = load_number_formats(&mut zip, is_1904)?;
        Ok(XlsxSpreadsheet {
            name,
            zip,
            number_formats,
            sheets,
        })
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Shared strings live in their own part and are referenced by index,
    /// so only the indexes the sheets actually use are materialized.
    fn load_shared_strings(&mut self, mut indexes: Option<HashSet<usize>>) -> Result<(Vec<String>, HashMap<usize, usize>), RetroError> {
        let mut shared_strings = Vec::<String>::new();
        let mut mappings = HashMap::<usize, usize>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok((shared_strings, mappings)),
        };

        let mut id = 0usize;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                if let Some(keys) = &mut indexes {
                    if keys.remove(&id) {
                        let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                        mappings.insert(id, shared_strings.len());
                        shared_strings.push(string);
                    }
                    if keys.is_empty() {
                        break;
                    }
                } else {
                    let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                    mappings.insert(id, shared_strings.len());
                    shared_strings.push(string);
                }
                id += 1;
            }
        });
        Ok((shared_strings, mappings))
    }

    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, RetroError> {
        let mut sheets = Vec::<Sheet>::new();
        for (sheet_name, zip_path) in &self.sheets {
            if !criteria.accept(sheet_name) {
                continue;
            }

            let mut sheet = Sheet::new(sheet_name, criteria.skip_empty_rows);
            let mut row_count = 0usize;
            let mut col_count = 0usize;
            let mut row = 0usize;
            let mut col = 0usize;
            let mut kind = CellType::default();
            let mut value = String::new();
            let mut reader = self.zip.xml_reader(zip_path)?
                .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == TAG_ROW => {
                    row_count += 1;
                    col_count = 0;
                }
                Event::Start(event) if event.name() == TAG_ROW => {
                    if let Some(number) = event.get_attribute_value("r")? {
                        row_count = row_to_index(&number).unwrap_or(row_count);
                    }
                }
                Event::Start(event) if event.name() == TAG_CELL => {
                    (row, col) = event.get_attribute_value("r")?
                        .and_then(|reference| reference_to_index(&reference))
                        .unwrap_or((row_count, col_count));
                    col_count = col + 1;
                    value.clear();
                    kind = event.get_attribute_value("t")?.map(|t| {
                        match t.as_ref() {
                            "inlineStr" | "str" => CellType::InlineString,
                            "s" => CellType::SharedString,
                            "d" => CellType::IsoDateTime,
                            "b" => CellType::Boolean,
                            "e" => if criteria.error_as_null { CellType::Empty } else { CellType::Error },
                            _ => CellType::Number,
                        }
                    }).unwrap_or(CellType::Number);
                    if let Some(format_id) = event.get_attribute_value("s")? {
                        if kind == CellType::Number && !format_id.is_empty() {
                            let index = format_id.parse::<usize>()?;
                            kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                        }
                    }
                }
                Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                    value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
                }
                Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                    value = read_string_value(&mut reader, TAG_VALUE, true)?;
                }
                Event::End(event) if kind != CellType::Empty && !value.is_empty() && event.name() == TAG_CELL => {
                    let cell = Cell {
                        row,
                        col,
                        kind,
                        value: std::mem::take(&mut value),
                    };
                    if kind == CellType::Error {
                        return Err(SpreadsheetError::CellValueError(
                            self.name.to_owned(),
                            sheet.name.to_owned(),
                            cell.reference(),
                            cell.value,
                        ).into());
                    }
                    sheet.push(cell);
                },
            });
            sheets.push(sheet);
        }

        Ok(sheets)
    }
}

/// Loads worksheet names and part paths from `xl/workbook.xml`,
/// and whether the workbook uses the 1904 date system.
fn load_workbook(zip: &mut ZipArchive<UnifiedReader>) -> Result<(Vec<(String, String)>, bool), RetroError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Maps relationship ids to worksheet part paths.
fn load_relationships(zip: &mut ZipArchive<UnifiedReader>, path: &str) -> Result<HashMap<String, String>, RetroError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheets, charts and drawings are irrelevant here
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Loads the cell type of every cell style in `xl/styles.xml`.
/// Styles whose number format is a date or time mark the cell as such.
fn load_number_formats(zip: &mut ZipArchive<UnifiedReader>, is_1904: bool) -> Result<Vec<CellType>, RetroError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();

    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }

        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => break,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let id = event.get_attribute_value("numFmtId")?.unwrap_or(Cow::Borrowed("0"));
            format_indexes.push(id.to_string());
        }
    });

    Ok(format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect())
}

/// Normalizes a relationship target to a path inside the zip archive
fn to_zip_path(path: &str) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Reads string content up to `end_tag`, skipping phonetic annotations.
///
/// With `is_text_content` the element body itself is the text (`<v>`); otherwise
/// only `<t>` runs count (`<si>`, `<is>`, rich text).
fn read_string_value(
    reader: &mut XmlReader<BufReader<ZipFile<'_, UnifiedReader>>>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, RetroError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Format;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let date = Format::new().set_num_format("yyyy-mm-dd");
        let first = workbook.add_worksheet();
        first.set_name("Iteration 1").unwrap();
        first.write_string(0, 0, "Timestamp").unwrap();
        first.write_string(0, 1, "Q1").unwrap();
        first.write_number_with_format(1, 0, 45352.0, &date).unwrap();
        first.write_number(1, 1, 4.0).unwrap();
        first.write_string(2, 1, "n/a").unwrap();
        let second = workbook.add_worksheet();
        second.set_name("Iteration 2").unwrap();
        second.write_string(0, 0, "Q1 & more").unwrap();
        second.write_boolean(1, 0, true).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn relationship_targets() {
        assert_eq!(to_zip_path("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path("/xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(to_zip_path("xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn opens_workbook_structure() {
        let spreadsheet = XlsxSpreadsheet::open(&WorkbookSource::bytes("retro.xlsx", workbook_bytes())).unwrap();
        assert_eq!(spreadsheet.sheet_names(), vec!["Iteration 1", "Iteration 2"]);
        assert_eq!(spreadsheet.name(), "retro.xlsx");
    }

    #[test]
    fn reads_cells_with_types() {
        let mut spreadsheet = XlsxSpreadsheet::open(&WorkbookSource::bytes("retro.xlsx", workbook_bytes())).unwrap();
        let sheets = spreadsheet.read_sheets(&Criteria::default()).unwrap();
        assert_eq!(sheets.len(), 2);

        let first = &sheets[0];
        assert_eq!(first.cells.len(), 5);
        let date = first.cells.iter().find(|cell| cell.row == 1 && cell.col == 0).unwrap();
        assert_eq!(date.kind, CellType::NumberDate1900);
        let score = first.cells.iter().find(|cell| cell.row == 1 && cell.col == 1).unwrap();
        assert_eq!(score.kind, CellType::Number);
        assert_eq!(score.value.parse::<f64>().unwrap(), 4.0);

        let flag = &sheets[1].cells[1];
        assert_eq!(flag.kind, CellType::Boolean);
    }

    #[test]
    fn loads_only_requested_shared_strings() {
        let mut spreadsheet = XlsxSpreadsheet::open(&WorkbookSource::bytes("retro.xlsx", workbook_bytes())).unwrap();
        let (all, _) = spreadsheet.load_shared_strings(None).unwrap();
        assert!(all.contains(&"Q1 & more".to_owned()));

        let (some, mappings) = spreadsheet.load_shared_strings(Some(HashSet::from([1]))).unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0], all[1]);
        assert_eq!(mappings.get(&1), Some(&0));
    }

    #[test]
    fn criteria_selects_sheets() {
        let mut spreadsheet = XlsxSpreadsheet::open(&WorkbookSource::bytes("retro.xlsx", workbook_bytes())).unwrap();
        let sheets = spreadsheet.read_sheets(&Criteria::sheet("Iteration 2")).unwrap();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "Iteration 2");
    }

    fn rewrite_part(bytes: Vec<u8>, part: &str, replacements: &[(&str, &str)]) -> Vec<u8> {
        use std::io::Read;
        use std::io::Write;
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for index in 0..archive.len() {
            let mut file = archive.by_index(index).unwrap();
            let mut content = String::new();
            file.read_to_string(&mut content).unwrap();
            if file.name() == part {
                for (from, to) in replacements {
                    content = content.replace(from, to);
                }
            }
            writer.start_file(file.name(), zip::write::SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn out_of_range_references_fall_back_to_position() {
        let bytes = rewrite_part(
            workbook_bytes(),
            "xl/worksheets/sheet1.xml",
            &[(r#"r="B2""#, r#"r="ZZZZZZ2""#), (r#"<row r="3""#, r#"<row r="99999999""#)],
        );
        let mut spreadsheet = XlsxSpreadsheet::open(&WorkbookSource::bytes("retro.xlsx", bytes)).unwrap();
        let sheets = spreadsheet.read_sheets(&Criteria::sheet("Iteration 1")).unwrap();
        let first = &sheets[0];
        assert_eq!(first.cells.len(), 5);
        let score = first.cells.iter().find(|cell| cell.row == 1 && cell.col == 1).unwrap();
        assert_eq!(score.value.parse::<f64>().unwrap(), 4.0);
        assert!(first.cells.iter().all(|cell| cell.row < 3 && cell.col < 2));
        assert_eq!(first.grid().len(), 3);
    }

    #[test]
    fn rejects_non_zip_input() {
        let result = XlsxSpreadsheet::open(&WorkbookSource::bytes("notes.txt", b"not a workbook".to_vec()));
        assert!(result.is_err());
    }
}
