//! Fixed layout of the retrospective form.
//!
//! Columns are addressed by position. The first two columns of every sheet are
//! metadata (timestamp and overall score), followed by the Likert questions.
use serde::Serialize;
use std::ops::Range;

/// A survey theme: a contiguous run of Likert question columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionGroup {
    pub name: &'static str,
    /// Column positions, end exclusive
    pub columns: Range<usize>,
}

/// The six themes, in form order. Together they cover the Likert columns.
pub static QUESTION_GROUPS: [QuestionGroup; 6] = [
    QuestionGroup { name: "Psychological Safety", columns: 2..5 },
    QuestionGroup { name: "Dependability", columns: 5..8 },
    QuestionGroup { name: "Structure & Clarity", columns: 8..11 },
    QuestionGroup { name: "Meaning", columns: 11..14 },
    QuestionGroup { name: "Impact", columns: 14..17 },
    QuestionGroup { name: "Personal Reflection", columns: 17..23 },
];

/// Metadata columns that never take part in the analysis.
pub const METADATA_COLUMNS: Range<usize> = 0..2;

/// Every Likert question column (timestamp, score and free text excluded).
pub const LIKERT_COLUMNS: Range<usize> = METADATA_COLUMNS.end..23;

/// The only sheet whose free-text reflections are analysed.
pub const REFLECTION_SHEET: &str = "Iteration 3";

/// Looks a group up by its display name.
pub fn question_group(name: &str) -> Option<&'static QuestionGroup> {
    QUESTION_GROUPS.iter().find(|group| group.name == name)
}

/// Clamps a positional range to the number of columns actually present.
pub fn clamp_columns(columns: &Range<usize>, width: usize) -> Range<usize> {
    columns.start.min(width)..columns.end.min(width)
}
