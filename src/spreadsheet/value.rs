use serde::Serialize;
use std::fmt::Display;

/// A resolved cell value.
///
/// Cells are classified once while the workbook is loaded; aggregation code only
/// ever matches on this enum and never re-parses raw cell text.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Value {
    /// Classifies a string cell: numeric-looking text becomes a number,
    /// anything else stays text.
    pub fn from_text(text: &str) -> Value {
        match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Value::Number(number),
            _ => Value::Text(text.to_owned()),
        }
    }

    /// Numeric coercion: numbers map to themselves, everything else is missing.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// String rendering of a present value, `None` for missing cells.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            value => Some(value.to_string()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(number) => write!(f, "{}", number),
            Value::Text(text) => write!(f, "{}", text),
            Value::Missing => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_resolved() {
        assert_eq!(Value::from_text("4"), Value::Number(4.0));
        assert_eq!(Value::from_text(" 3.5 "), Value::Number(3.5));
        assert_eq!(Value::from_text("x"), Value::Text("x".to_owned()));
        assert_eq!(Value::from_text("NaN"), Value::Text("NaN".to_owned()));
        assert_eq!(Value::from_text("inf"), Value::Text("inf".to_owned()));
    }

    #[test]
    fn coercion() {
        assert_eq!(Value::Number(5.0).as_number(), Some(5.0));
        assert_eq!(Value::Text("five".to_owned()).as_number(), None);
        assert_eq!(Value::Missing.as_number(), None);
    }

    #[test]
    fn rendering() {
        assert_eq!(Value::Number(5.0).render().as_deref(), Some("5"));
        assert_eq!(Value::Number(4.25).render().as_deref(), Some("4.25"));
        assert_eq!(Value::Missing.render(), None);
    }
}
