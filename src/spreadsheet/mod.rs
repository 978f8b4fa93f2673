//! # Spreadsheet Module
//!
//! Reads Office Open XML workbooks (`.xlsx`, `.xlsm`) straight from the zip package
//! and turns every worksheet into a [`SheetTable`]: a header row plus records of
//! resolved [`Value`]s.
use crate::error::RetroError;
use crate::helpers::reader::WorkbookSource;
use std::collections::HashMap;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod table;
pub(crate) mod value;
pub(crate) mod xlsx;

pub use criteria::Criteria;
pub use table::SheetTable;
pub use value::Value;

use sheet::Sheet;
use xlsx::XlsxSpreadsheet;

/// Errors raised while reading the workbook package.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing '{0}' in workbook package")]
    FileError(String),

    #[error("Workbook '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Workbook '{0}' is password protected or not an xlsx file")]
    SpreadsheetPasswordProtectedError(String),

    #[error("Invalid cell value at '{1}'!{2}: {3}")]
    CellValueError(String, String, String, String),
}

/// A workbook format that can list its sheets and stream their cells.
pub(crate) trait Spreadsheet {
    /// Display name of the workbook
    fn name(&self) -> String;

    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Loads shared strings, restricted to `indexes` when given.
    /// Returns the strings and a mapping from string index to position in the returned vector.
    fn load_shared_strings(&mut self, indexes: Option<HashSet<usize>>) -> Result<(Vec<String>, HashMap<usize, usize>), RetroError>;

    /// Reads every sheet accepted by the criteria, in workbook order
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, RetroError>;
}

pub(crate) fn open_spreadsheet(source: &WorkbookSource) -> Result<Box<dyn Spreadsheet>, RetroError> {
    Ok(Box::new(XlsxSpreadsheet::open(source)?))
}

/// Reads the sheets selected by `criteria` into tables, in workbook order.
pub fn read_tables(source: &WorkbookSource, criteria: &Criteria) -> Result<Vec<SheetTable>, RetroError> {
    let mut spreadsheet = open_spreadsheet(source)?;
    let sheets = spreadsheet.read_sheets(criteria)?;
    let indexes: HashSet<usize> = sheets
        .iter()
        .flat_map(|sheet| sheet.cells.iter().filter_map(|cell| cell.shared_string_index()))
        .collect();
    let (shared_strings, mappings) = if indexes.is_empty() {
        (Vec::new(), HashMap::new())
    } else {
        spreadsheet.load_shared_strings(Some(indexes))?
    };
    debug!(
        workbook = spreadsheet.name().as_str(),
        sheets = sheets.len(),
        shared_strings = shared_strings.len(),
        "read workbook"
    );
    Ok(sheets
        .iter()
        .map(|sheet| sheet.to_table(&shared_strings, &mappings))
        .collect())
}
