use crate::analysis::aggregate::rows_by_retrospective;
use crate::survey::ResponseTable;
use crate::survey::RetrospectiveFilter;
use serde::Serialize;

/// Box-plot statistics of one set of answers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value not below `q1 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value not above `q3 + 1.5 * IQR`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Answer distribution of one retrospective; `None` without numeric answers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrospectiveDistribution {
    pub retrospective: String,
    pub stats: Option<BoxStats>,
}

/// Quantile of sorted values with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

impl BoxStats {
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let q1 = quantile(&values, 0.25);
        let q3 = quantile(&values, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        let inside = || values.iter().copied().filter(|value| (low_fence..=high_fence).contains(value));
        Some(BoxStats {
            count: values.len(),
            min: values[0],
            q1,
            median: quantile(&values, 0.5),
            q3,
            max: values[values.len() - 1],
            lower_whisker: inside().fold(f64::INFINITY, f64::min),
            upper_whisker: inside().fold(f64::NEG_INFINITY, f64::max),
            outliers: values
                .iter()
                .copied()
                .filter(|value| !(low_fence..=high_fence).contains(value))
                .collect(),
        })
    }
}

/// Distribution of one question's numeric answers per retrospective.
pub fn score_distribution(
    table: &ResponseTable,
    column: usize,
    filter: &RetrospectiveFilter,
) -> Vec<RetrospectiveDistribution> {
    rows_by_retrospective(table, filter)
        .into_iter()
        .map(|(retrospective, rows)| RetrospectiveDistribution {
            retrospective: retrospective.to_owned(),
            stats: BoxStats::from_values(rows.iter().filter_map(|row| row.value(column).as_number()).collect()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::SheetTable;
    use crate::spreadsheet::Value;

    #[test]
    fn linear_quartiles() {
        let stats = BoxStats::from_values(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!((stats.min, stats.max), (1.0, 4.0));
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert!(stats.outliers.is_empty());
        assert_eq!((stats.lower_whisker, stats.upper_whisker), (1.0, 4.0));
    }

    #[test]
    fn outliers_beyond_whiskers() {
        let stats = BoxStats::from_values(vec![1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!((stats.q1, stats.median, stats.q3), (2.0, 3.0, 4.0));
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn single_and_empty() {
        let stats = BoxStats::from_values(vec![5.0]).unwrap();
        assert_eq!((stats.q1, stats.median, stats.q3), (5.0, 5.0, 5.0));
        assert!(BoxStats::from_values(Vec::new()).is_none());
    }

    #[test]
    fn per_retrospective() {
        let header = vec![Value::Text("Q".to_owned())];
        let table = ResponseTable::concat(&[
            SheetTable::new("1", &header, vec![vec![Value::Number(3.0)], vec![Value::Text("x".to_owned())]]),
            SheetTable::new("2", &header, vec![vec![Value::Missing]]),
        ]);
        let distribution = score_distribution(&table, 0, &RetrospectiveFilter::all());
        assert_eq!(distribution.len(), 2);
        assert_eq!(distribution[0].stats.as_ref().map(|stats| stats.count), Some(1));
        assert_eq!(distribution[1].retrospective, "2");
        assert!(distribution[1].stats.is_none());
    }
}
