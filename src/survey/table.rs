use crate::spreadsheet::SheetTable;
use crate::spreadsheet::Value;
use crate::survey::filter::RetrospectiveFilter;
use crate::survey::layout::clamp_columns;
use crate::survey::layout::QuestionGroup;
use crate::survey::layout::LIKERT_COLUMNS;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::warn;

/// One survey response: the retrospective it came from and one value per table column.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub retrospective: String,
    pub values: Vec<Value>,
}

impl Response {
    pub fn value(&self, column: usize) -> &Value {
        static MISSING: Value = Value::Missing;
        self.values.get(column).unwrap_or(&MISSING)
    }
}

/// All responses of a workbook, every sheet tagged with its name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseTable {
    /// Union of the sheet headers in first-appearance order
    pub columns: Vec<String>,
    pub rows: Vec<Response>,
}

/// A hint that the workbook does not follow the positional form layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// Fewer columns than the Likert range requires
    MissingColumns { found: usize, expected: usize },
    /// A sheet's header at a Likert position differs from the unified column there
    HeaderMismatch {
        sheet: String,
        position: usize,
        expected: String,
        found: Option<String>,
    },
    /// A Likert column without a single numeric answer
    NonNumericColumn { position: usize, name: String },
}

impl Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::MissingColumns { found, expected } => {
                write!(f, "Workbook has {found} columns, the question groups expect {expected}")
            }
            LayoutWarning::HeaderMismatch { sheet, position, expected, found: Some(found) } => {
                write!(f, "Sheet '{sheet}' has '{found}' at column {position} where '{expected}' was expected")
            }
            LayoutWarning::HeaderMismatch { sheet, position, expected, found: None } => {
                write!(f, "Sheet '{sheet}' has no column {position} ('{expected}')")
            }
            LayoutWarning::NonNumericColumn { position, name } => {
                write!(f, "Question column {position} ('{name}') holds no numeric answers")
            }
        }
    }
}

impl ResponseTable {
    /// Concatenates sheets in the given order, tagging each row with its sheet name.
    ///
    /// Columns are aligned by header name; a name seen for the first time is
    /// appended, so sheets sharing a layout keep their positions.
    pub fn concat(sheets: &[SheetTable]) -> Self {
        let mut columns = Vec::<String>::new();
        let mut positions = HashMap::<String, usize>::new();
        for sheet in sheets {
            for title in &sheet.header {
                if !positions.contains_key(title) {
                    positions.insert(title.to_owned(), columns.len());
                    columns.push(title.to_owned());
                }
            }
        }

        let mut rows = Vec::<Response>::new();
        for sheet in sheets {
            let targets: Vec<usize> = sheet.header.iter().map(|title| positions[title]).collect();
            for record in &sheet.records {
                let mut values = vec![Value::Missing; columns.len()];
                for (value, target) in record.iter().zip(&targets) {
                    values[*target] = value.to_owned();
                }
                rows.push(Response {
                    retrospective: sheet.name.to_owned(),
                    values,
                });
            }
        }
        ResponseTable { columns, rows }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Distinct retrospectives in first-appearance order.
    pub fn retrospectives(&self) -> Vec<&str> {
        let mut retrospectives = Vec::<&str>::new();
        for row in &self.rows {
            if !retrospectives.contains(&row.retrospective.as_str()) {
                retrospectives.push(&row.retrospective);
            }
        }
        retrospectives
    }

    /// Rows whose retrospective passes the filter, in table order.
    pub fn filtered<'a>(&'a self, filter: &'a RetrospectiveFilter) -> impl Iterator<Item = &'a Response> + 'a {
        self.rows.iter().filter(move |row| filter.accept(&row.retrospective))
    }

    /// Positions of a group's columns that exist in this table.
    pub fn group_columns(&self, group: &QuestionGroup) -> Vec<usize> {
        clamp_columns(&group.columns, self.width()).collect()
    }

    /// Positions of all Likert columns that exist in this table.
    pub fn likert_columns(&self) -> Vec<usize> {
        clamp_columns(&LIKERT_COLUMNS, self.width()).collect()
    }

    /// Checks the unified table against the positional form layout.
    /// Each warning is also logged.
    pub fn layout_warnings(&self, sheets: &[SheetTable]) -> Vec<LayoutWarning> {
        let mut warnings = Vec::<LayoutWarning>::new();
        if self.width() < LIKERT_COLUMNS.end {
            warnings.push(LayoutWarning::MissingColumns {
                found: self.width(),
                expected: LIKERT_COLUMNS.end,
            });
        }
        for sheet in sheets {
            for position in self.likert_columns() {
                let expected = &self.columns[position];
                let found = sheet.header.get(position);
                if found != Some(expected) {
                    warnings.push(LayoutWarning::HeaderMismatch {
                        sheet: sheet.name.to_owned(),
                        position,
                        expected: expected.to_owned(),
                        found: found.cloned(),
                    });
                }
            }
        }
        for position in self.likert_columns() {
            if !self.rows.is_empty() && self.rows.iter().all(|row| row.value(position).as_number().is_none()) {
                warnings.push(LayoutWarning::NonNumericColumn {
                    position,
                    name: self.columns[position].to_owned(),
                });
            }
        }
        for warning in &warnings {
            warn!("{}", warning);
        }
        warnings
    }
}
