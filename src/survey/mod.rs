//! # Survey Module
//!
//! The retrospective form as the dashboard sees it: fixed question groups,
//! the response table concatenated from every sheet, and the reflection sheet.
use crate::error::RetroError;
use crate::error::ResultMessage;
use crate::helpers::reader::WorkbookSource;
use crate::spreadsheet::read_tables;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::SheetTable;
use thiserror::Error;
use tracing::debug;

pub(crate) mod filter;
pub(crate) mod layout;
pub(crate) mod table;

pub use filter::RetrospectiveFilter;
pub use layout::question_group;
pub use layout::QuestionGroup;
pub use layout::LIKERT_COLUMNS;
pub use layout::QUESTION_GROUPS;
pub use layout::REFLECTION_SHEET;
pub use table::LayoutWarning;
pub use table::Response;
pub use table::ResponseTable;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Unknown question group '{0}'")]
    UnknownGroup(String),

    #[error("Unknown question '{0}'")]
    UnknownQuestion(String),

    #[error("Question group '{0}' has no columns in this workbook")]
    EmptyGroup(String),

    #[error("Unknown column '{0}' in sheet '{1}'")]
    UnknownColumn(String, String),
}

/// A loaded workbook: every sheet as one response table, plus the reflection sheet.
#[derive(Clone, Debug)]
pub struct Workbook {
    pub name: String,
    pub table: ResponseTable,
    /// The sheet holding free-text reflections, when present
    pub reflections: Option<SheetTable>,
    pub warnings: Vec<LayoutWarning>,
}

/// Reads every sheet of the workbook, in workbook order.
pub fn load_workbook(source: &WorkbookSource) -> Result<Workbook, RetroError> {
    load_workbook_with(source, &Criteria::default())
}

/// Reads the sheets accepted by `criteria`, in workbook order.
pub fn load_workbook_with(source: &WorkbookSource, criteria: &Criteria) -> Result<Workbook, RetroError> {
    let name = source.name();
    let sheets = read_tables(source, criteria).with_prefix(&name)?;
    for sheet in &sheets {
        debug!(
            sheet = sheet.name.as_str(),
            columns = sheet.header.len(),
            rows = sheet.records.len(),
            "loaded sheet"
        );
    }
    let table = ResponseTable::concat(&sheets);
    let warnings = table.layout_warnings(&sheets);
    let reflections = sheets.into_iter().find(|sheet| sheet.name == REFLECTION_SHEET);
    Ok(Workbook {
        name,
        table,
        reflections,
        warnings,
    })
}

impl Workbook {
    /// Question group by display name.
    pub fn group(&self, name: &str) -> Result<&'static QuestionGroup, SurveyError> {
        question_group(name).ok_or_else(|| SurveyError::UnknownGroup(name.to_owned()))
    }

    /// Column position of a Likert question, looked up by its header text.
    pub fn question(&self, name: &str) -> Result<usize, SurveyError> {
        self.table
            .column_index(name)
            .filter(|index| LIKERT_COLUMNS.contains(index))
            .ok_or_else(|| SurveyError::UnknownQuestion(name.to_owned()))
    }

    /// Headers of a group's questions, in column order.
    pub fn group_questions(&self, group: &QuestionGroup) -> Vec<&str> {
        self.table
            .group_columns(group)
            .into_iter()
            .map(|index| self.table.columns[index].as_str())
            .collect()
    }
}
