use crate::survey::QuestionGroup;
use crate::survey::Response;
use crate::survey::ResponseTable;
use crate::survey::RetrospectiveFilter;
use serde::Serialize;

/// Mean score of one retrospective. `None` when no numeric answer contributed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrospectiveMean {
    pub retrospective: String,
    pub mean: Option<f64>,
}

/// Arithmetic mean, `None` for an empty input.
pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Filtered rows grouped by retrospective, in first-appearance order.
pub(crate) fn rows_by_retrospective<'a>(
    table: &'a ResponseTable,
    filter: &'a RetrospectiveFilter,
) -> Vec<(&'a str, Vec<&'a Response>)> {
    let mut groups = Vec::<(&str, Vec<&Response>)>::new();
    for row in table.filtered(filter) {
        match groups.iter_mut().find(|(name, _)| *name == row.retrospective) {
            Some((_, rows)) => rows.push(row),
            None => groups.push((row.retrospective.as_str(), vec![row])),
        }
    }
    groups
}

/// Numeric answers of one column.
fn column_numbers<'a>(rows: &'a [&'a Response], column: usize) -> impl Iterator<Item = f64> + 'a {
    rows.iter().filter_map(move |row| row.value(column).as_number())
}

/// Two-level mean per retrospective: the mean of each column over its numeric
/// answers, then the mean of the defined column means.
pub fn columns_mean(table: &ResponseTable, columns: &[usize], filter: &RetrospectiveFilter) -> Vec<RetrospectiveMean> {
    rows_by_retrospective(table, filter)
        .into_iter()
        .map(|(retrospective, rows)| RetrospectiveMean {
            retrospective: retrospective.to_owned(),
            mean: mean(columns.iter().filter_map(|column| mean(column_numbers(&rows, *column)))),
        })
        .collect()
}

/// Theme score per retrospective over the group's columns.
pub fn grouped_theme_mean(
    table: &ResponseTable,
    group: &QuestionGroup,
    filter: &RetrospectiveFilter,
) -> Vec<RetrospectiveMean> {
    columns_mean(table, &table.group_columns(group), filter)
}

/// Score of a single question per retrospective.
pub fn single_question_mean(table: &ResponseTable, column: usize, filter: &RetrospectiveFilter) -> Vec<RetrospectiveMean> {
    columns_mean(table, &[column], filter)
}

/// Overall score per retrospective over every Likert column.
pub fn overall_trend(
    table: &ResponseTable,
    likert_columns: &[usize],
    filter: &RetrospectiveFilter,
) -> Vec<RetrospectiveMean> {
    columns_mean(table, likert_columns, filter)
}

/// Mean of the defined per-retrospective means, unweighted by response count.
pub fn overall_average(means: &[RetrospectiveMean]) -> Option<f64> {
    mean(means.iter().filter_map(|mean| mean.mean))
}

/// Raw mean of one column over every filtered row.
pub fn question_mean(table: &ResponseTable, column: usize, filter: &RetrospectiveFilter) -> Option<f64> {
    mean(table.filtered(filter).filter_map(|row| row.value(column).as_number()))
}
