use crate::spreadsheet::value::Value;
use std::collections::HashMap;

static MISSING: Value = Value::Missing;

/// One parsed worksheet: a header row and the records below it.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetTable {
    pub name: String,
    pub header: Vec<String>,
    /// Records padded to the header width
    pub records: Vec<Vec<Value>>,
}

impl SheetTable {
    /// Builds a table from the raw header row.
    ///
    /// Blank header cells are named `Unnamed: {index}` and repeated names get a
    /// `.1`, `.2`, ... suffix so every column can be addressed by name.
    pub fn new(name: &str, header: &[Value], records: Vec<Vec<Value>>) -> Self {
        let width = records.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
        let mut seen = HashMap::<String, usize>::new();
        let header = (0..width)
            .map(|index| {
                let title = header
                    .get(index)
                    .and_then(Value::render)
                    .map(|title| title.trim().to_owned())
                    .filter(|title| !title.is_empty())
                    .unwrap_or_else(|| format!("Unnamed: {index}"));
                let count = seen.entry(title.to_owned()).or_insert(0);
                let unique = if *count == 0 { title } else { format!("{title}.{count}") };
                *count += 1;
                unique
            })
            .collect();
        let records = records
            .into_iter()
            .map(|mut record| {
                record.resize(width, Value::Missing);
                record
            })
            .collect();
        SheetTable {
            name: name.to_owned(),
            header,
            records,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|title| title == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.records.iter().map(move |record| record.get(index).unwrap_or(&MISSING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    #[test]
    fn header_names_are_unique() {
        let header = vec![text("Q"), Value::Missing, text("Q"), Value::Number(5.0), text("Q")];
        let table = SheetTable::new("s", &header, Vec::new());
        assert_eq!(table.header, vec!["Q", "Unnamed: 1", "Q.1", "5", "Q.2"]);
    }

    #[test]
    fn records_are_padded() {
        let table = SheetTable::new("s", &[text("A"), text("B")], vec![vec![Value::Number(1.0)]]);
        assert_eq!(table.records[0], vec![Value::Number(1.0), Value::Missing]);
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![&Value::Missing]);
        assert_eq!(table.column_index("B"), Some(1));
        assert_eq!(table.column_index("C"), None);
    }

    #[test]
    fn wide_records_extend_header() {
        let table = SheetTable::new("s", &[text("A")], vec![vec![Value::Number(1.0), text("extra")]]);
        assert_eq!(table.header, vec!["A", "Unnamed: 1"]);
    }
}
