use glob::Pattern;

/// Criteria for selecting data from a workbook.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Sheet name patterns for filtering which sheets to process.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Convert error cells (`#N/A`, `#DIV/0!`) to missing values instead of failing.
    pub error_as_null: bool,

    /// Skip rows where all columns are empty.
    pub skip_empty_rows: bool,
}

impl Default for Criteria {
    /// All sheets, error cells as missing values, blank rows dropped.
    fn default() -> Self {
        Criteria {
            sheet_name_patterns: None,
            error_as_null: true,
            skip_empty_rows: true,
        }
    }
}

impl Criteria {
    /// Criteria restricted to exactly one sheet name.
    pub fn sheet(name: &str) -> Self {
        Criteria {
            sheet_name_patterns: Some(vec![exact_pattern(name)]),
            ..Criteria::default()
        }
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }
}

/// A glob pattern that matches `name` literally, even when it contains `*`, `?` or `[`.
pub(crate) fn exact_pattern(name: &str) -> Pattern {
    Pattern::new(&Pattern::escape(name)).expect("Escaped pattern")
}
