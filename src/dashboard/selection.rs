use crate::survey::RetrospectiveFilter;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// How the selected question group is charted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// One theme score per retrospective
    #[default]
    Grouped,
    /// One question's scores per retrospective
    Individual,
}

/// Which part of the dashboard to produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Quantitative,
    Textual,
    #[default]
    All,
}

impl FromStr for View {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "grouped" | "grouped theme" => Ok(View::Grouped),
            "individual" | "individual question" => Ok(View::Individual),
            _ => Err(format!("Unknown view '{value}', expected 'grouped' or 'individual'")),
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Grouped => write!(f, "Grouped Theme"),
            View::Individual => write!(f, "Individual Question"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quantitative" => Ok(Tab::Quantitative),
            "textual" => Ok(Tab::Textual),
            "all" => Ok(Tab::All),
            _ => Err(format!("Unknown tab '{value}', expected 'quantitative', 'textual' or 'all'")),
        }
    }
}

impl Tab {
    pub fn quantitative(&self) -> bool {
        matches!(self, Tab::Quantitative | Tab::All)
    }

    pub fn textual(&self) -> bool {
        matches!(self, Tab::Textual | Tab::All)
    }
}

/// The sidebar state: everything a report depends on besides the workbook.
#[derive(Clone, Debug)]
pub struct Selection {
    pub retrospectives: RetrospectiveFilter,
    /// Question group name, the first group when absent
    pub group: Option<String>,
    pub view: View,
    /// Question header for the individual view, the group's first question when absent
    pub question: Option<String>,
    pub show_average_line: bool,
    /// Reflection column, the first long-form column when absent
    pub reflection: Option<String>,
    /// Responses listed per sentiment ranking
    pub top: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            retrospectives: RetrospectiveFilter::all(),
            group: None,
            view: View::Grouped,
            question: None,
            show_average_line: true,
            reflection: None,
            top: 3,
        }
    }
}
