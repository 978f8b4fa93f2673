use crate::spreadsheet::SheetTable;
use crate::spreadsheet::Value;
use crate::survey::SurveyError;
use crate::text::LONG_FORM_THRESHOLD;

/// Columns holding long free-text answers, in sheet order.
///
/// A column qualifies when it has at least one text answer and the mean
/// character length of its present values exceeds the long-form threshold.
pub fn long_form_columns(sheet: &SheetTable) -> Vec<&str> {
    sheet
        .header
        .iter()
        .enumerate()
        .filter(|(index, _)| is_long_form(sheet.column(*index)))
        .map(|(_, title)| title.as_str())
        .collect()
}

fn is_long_form<'a, I: Iterator<Item = &'a Value>>(values: I) -> bool {
    let mut has_text = false;
    let (mut length, mut count) = (0usize, 0usize);
    for value in values {
        if let Some(rendered) = value.render() {
            has_text |= matches!(value, Value::Text(_));
            length += rendered.chars().count();
            count += 1;
        }
    }
    has_text && length as f64 / count as f64 > LONG_FORM_THRESHOLD
}

/// Non-blank responses, trimmed, in input order.
pub fn select_text_responses<'a, I: IntoIterator<Item = &'a Value>>(values: I) -> Vec<String> {
    values
        .into_iter()
        .filter_map(Value::render)
        .map(|response| response.trim().to_owned())
        .filter(|response| !response.is_empty())
        .collect()
}

/// Responses of one named column of the reflection sheet.
pub fn column_responses(sheet: &SheetTable, column: &str) -> Result<Vec<String>, SurveyError> {
    let index = sheet
        .column_index(column)
        .ok_or_else(|| SurveyError::UnknownColumn(column.to_owned(), sheet.name.to_owned()))?;
    Ok(select_text_responses(sheet.column(index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    #[test]
    fn blank_responses_are_dropped() {
        let values = vec![text("hello world"), text(""), text("  "), Value::Missing, text("ok")];
        assert_eq!(select_text_responses(&values), vec!["hello world", "ok"]);
    }

    #[test]
    fn responses_are_trimmed() {
        let values = vec![text("  spaced out \n"), Value::Number(4.0)];
        assert_eq!(select_text_responses(&values), vec!["spaced out", "4"]);
    }

    #[test]
    fn long_form_detection() {
        let long = "This sentence is comfortably longer than thirty characters";
        let header = vec![text("Score"), text("Short"), text("Long"), text("Mixed"), text("Empty")];
        let sheet = SheetTable::new(
            "Iteration 3",
            &header,
            vec![
                vec![Value::Number(4.0), text("ok"), text(long), text(long), Value::Missing],
                vec![Value::Number(5.0), text("fine"), Value::Missing, text("no"), Value::Missing],
            ],
        );
        // "Mixed" averages (58 + 2) / 2 = 30 characters, which is not above the threshold
        assert_eq!(long_form_columns(&sheet), vec!["Long"]);
    }

    #[test]
    fn numeric_columns_never_qualify() {
        let header = vec![text("Id")];
        let sheet = SheetTable::new("s", &header, vec![vec![Value::Number(1.0e40)]]);
        assert!(long_form_columns(&sheet).is_empty());
    }

    #[test]
    fn responses_by_column_name() {
        let header = vec![text("What went well?")];
        let sheet = SheetTable::new("Iteration 3", &header, vec![vec![text(" Pairing ")], vec![Value::Missing]]);
        assert_eq!(column_responses(&sheet, "What went well?").unwrap(), vec!["Pairing"]);
        assert_eq!(
            column_responses(&sheet, "Why?").unwrap_err().to_string(),
            "Unknown column 'Why?' in sheet 'Iteration 3'"
        );
    }
}
