use crate::error::RetroError;
use crate::spreadsheet::criteria::exact_pattern;
use glob::Pattern;

/// Which retrospectives take part in an aggregation.
///
/// `None` selects every retrospective, matching the dashboard default where
/// all sheets are pre-selected.
#[derive(Clone, Debug, Default)]
pub struct RetrospectiveFilter {
    patterns: Option<Vec<Pattern>>,
}

impl RetrospectiveFilter {
    pub fn all() -> Self {
        RetrospectiveFilter { patterns: None }
    }

    /// Exactly the named retrospectives.
    pub fn only<S: AsRef<str>>(names: &[S]) -> Self {
        RetrospectiveFilter {
            patterns: Some(names.iter().map(|name| exact_pattern(name.as_ref())).collect()),
        }
    }

    /// Glob patterns such as `Iteration *`.
    pub fn patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RetroError> {
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RetrospectiveFilter { patterns: Some(patterns) })
    }

    pub fn accept(&self, retrospective: &str) -> bool {
        match &self.patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(retrospective)),
            None => true,
        }
    }
}
