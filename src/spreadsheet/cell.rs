use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::value::Value;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Types of raw cell data in a worksheet part.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (0/1)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as fractions of a day
    NumberTime,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Maps built-in Excel number format IDs to date/time cell types.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::NumberTime),
            _ => None,
        }
    }

    /// Inspects a custom number format code for date and time tokens,
    /// ignoring quoted literals, escapes and bracketed colors.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, _) => Self::NumberTime,
            (false, false, _) => Self::Number,
        }
    }
}

/// A single raw cell as read from the worksheet part.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Cell value as stored in the XML (shared string index for `SharedString`)
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Shared string index referenced by this cell, if any.
    pub(crate) fn shared_string_index(&self) -> Option<usize> {
        match self.kind {
            CellType::SharedString => self.value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Resolves the raw cell into a typed value.
    ///
    /// `mappings` translates shared string indexes into positions of `shared_strings`.
    pub(crate) fn resolve(&self, shared_strings: &[String], mappings: &HashMap<usize, usize>) -> Value {
        match self.kind {
            CellType::Empty | CellType::Error => Value::Missing,
            CellType::Boolean => Value::Number(if self.value == "1" { 1.0 } else { 0.0 }),
            CellType::Number => self.value.parse::<f64>().map(Value::Number).unwrap_or(Value::Missing),
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                self.to_datetime().map(|datetime| Value::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()))
                    .unwrap_or_else(|| Value::from_text(&self.value))
            }
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                self.to_datetime().map(|datetime| Value::Text(datetime.format("%Y-%m-%d").to_string()))
                    .unwrap_or_else(|| Value::from_text(&self.value))
            }
            CellType::NumberTime => {
                self.to_datetime().map(|datetime| Value::Text(datetime.format("%H:%M:%S").to_string()))
                    .unwrap_or_else(|| Value::from_text(&self.value))
            }
            CellType::IsoDateTime => Value::Text(self.value.replace('T', " ")),
            CellType::InlineString => Value::from_text(&self.value),
            CellType::SharedString => self
                .shared_string_index()
                .and_then(|index| mappings.get(&index))
                .and_then(|position| shared_strings.get(*position))
                .map(|text| Value::from_text(text))
                .unwrap_or(Value::Missing),
        }
    }

    /// Converts an Excel serial number to a timestamp.
    /// Handles the 1900 epoch (with the Lotus 1-2-3 leap year bug) and the 1904 epoch.
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        let serial = self.value.parse::<f64>().ok().filter(|serial| serial.is_finite() && *serial >= 0.0)?;
        let days = serial.trunc() as i64;
        let offset = match self.kind {
            CellType::NumberDateTime1904 | CellType::NumberDate1904 => days + 1462,
            _ if days < 60 => days + 1,
            _ => days,
        };
        let milliseconds = (serial.fract() * 86_400_000f64).round() as i64;
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        epoch.checked_add_signed(Duration::days(offset))?
            .checked_add_signed(Duration::milliseconds(milliseconds))
    }
}
