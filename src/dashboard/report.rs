use crate::analysis::RetrospectiveDistribution;
use crate::analysis::RetrospectiveMean;
use crate::dashboard::selection::View;
use crate::survey::LayoutWarning;
use crate::text::HistogramBin;
use crate::text::SentimentRecord;
use crate::text::SentimentSummary;
use crate::text::WordCount;
use serde::Serialize;
use std::fmt::Display;

/// A branch of the dashboard that was skipped, with the reason shown in its place.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    SheetMissing { sheet: String },
    NoLongFormColumns { sheet: String },
    NoResponses { column: String },
    UnknownColumn { column: String, sheet: String },
    NotEnoughWords,
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::SheetMissing { sheet } => write!(f, "Sheet '{sheet}' not found."),
            Notice::NoLongFormColumns { sheet } => write!(f, "No long-form text responses detected in {sheet}."),
            Notice::NoResponses { column } => write!(f, "No valid text responses found in '{column}'."),
            Notice::UnknownColumn { column, sheet } => {
                write!(f, "Column '{column}' is not a long-form text column of {sheet}.")
            }
            Notice::NotEnoughWords => write!(f, "Not enough words to generate a word cloud."),
        }
    }
}

/// Per-retrospective bars with an optional dashed reference line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeanChart {
    pub title: String,
    pub means: Vec<RetrospectiveMean>,
    pub reference_line: Option<f64>,
}

/// The quantitative tab.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuantitativeReport {
    /// Retrospectives left after filtering, in table order
    pub retrospectives: Vec<String>,
    pub group: String,
    pub view: View,
    /// Selected question of the individual view
    pub question: Option<String>,
    pub chart: MeanChart,
    /// Box statistics of the selected question; empty in the grouped view
    pub distribution: Vec<RetrospectiveDistribution>,
    pub trend: Vec<RetrospectiveMean>,
    pub warnings: Vec<LayoutWarning>,
}

/// Sentiment of the selected reflection column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SentimentReport {
    pub summary: SentimentSummary,
    pub top_positive: Vec<SentimentRecord>,
    pub top_negative: Vec<SentimentRecord>,
    pub histogram: Vec<HistogramBin>,
}

/// The textual tab. Sections after a notice are left empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TextualReport {
    pub sheet: String,
    /// Long-form columns offered for selection
    pub columns: Vec<String>,
    pub column: Option<String>,
    pub responses: Vec<String>,
    pub word_cloud: Vec<WordCount>,
    pub sentiment: Option<SentimentReport>,
    pub notice: Option<Notice>,
}

/// Everything produced for one selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub workbook: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantitative: Option<QuantitativeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textual: Option<TextualReport>,
}
