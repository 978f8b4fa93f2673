use crate::text::lexicon::PolarityScorer;
use serde::Serialize;
use std::cmp::Ordering;

/// A response with its polarity in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SentimentRecord {
    pub response: String,
    pub polarity: f64,
}

/// Count of polarities falling in `[lower, upper)`; the last bin includes `upper`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Headline numbers of a sentiment analysis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub responses: usize,
    /// `None` without responses
    pub average_polarity: Option<f64>,
}

/// Scores every response, keeping input order.
pub fn compute_sentiment<S: PolarityScorer + ?Sized>(responses: &[String], scorer: &S) -> Vec<SentimentRecord> {
    responses
        .iter()
        .map(|response| SentimentRecord {
            response: response.to_owned(),
            polarity: scorer.polarity(response),
        })
        .collect()
}

/// Stable sort by polarity, then the first `n`.
fn top_by<F>(records: &[SentimentRecord], n: usize, order: F) -> Vec<SentimentRecord>
where
    F: Fn(&SentimentRecord, &SentimentRecord) -> Ordering,
{
    let mut sorted = records.to_vec();
    sorted.sort_by(order);
    sorted.truncate(n);
    sorted
}

/// The `n` most positive records; ties keep input order.
pub fn top_positive(records: &[SentimentRecord], n: usize) -> Vec<SentimentRecord> {
    top_by(records, n, |a, b| b.polarity.total_cmp(&a.polarity))
}

/// The `n` most negative records; ties keep input order.
pub fn top_negative(records: &[SentimentRecord], n: usize) -> Vec<SentimentRecord> {
    top_by(records, n, |a, b| a.polarity.total_cmp(&b.polarity))
}

/// Equal-width bins over `[-1, 1]`.
pub fn polarity_histogram(records: &[SentimentRecord], bins: usize) -> Vec<HistogramBin> {
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|index| HistogramBin {
            lower: bin_edge(index, bins),
            upper: bin_edge(index + 1, bins),
            count: 0,
        })
        .collect();
    for record in records {
        let polarity = record.polarity.clamp(-1.0, 1.0);
        if let Some(index) = histogram.iter().rposition(|bin| bin.lower <= polarity) {
            histogram[index].count += 1;
        } else if let Some(first) = histogram.first_mut() {
            first.count += 1;
        }
    }
    histogram
}

// Exact ratio so that edges such as -0.8 or 0.4 match their literals.
fn bin_edge(index: usize, bins: usize) -> f64 {
    (2 * index as i64 - bins as i64) as f64 / bins as f64
}

impl SentimentSummary {
    pub fn from_records(records: &[SentimentRecord]) -> Self {
        SentimentSummary {
            responses: records.len(),
            average_polarity: crate::analysis::aggregate::mean(records.iter().map(|record| record.polarity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::lexicon::LexiconScorer;

    fn records(polarities: &[(&str, f64)]) -> Vec<SentimentRecord> {
        polarities
            .iter()
            .map(|(response, polarity)| SentimentRecord {
                response: response.to_string(),
                polarity: *polarity,
            })
            .collect()
    }

    fn responses(records: &[SentimentRecord]) -> Vec<&str> {
        records.iter().map(|record| record.response.as_str()).collect()
    }

    struct LengthScorer;

    impl PolarityScorer for LengthScorer {
        fn polarity(&self, text: &str) -> f64 {
            (text.len() as f64 / 10.0).min(1.0)
        }
    }

    #[test]
    fn scores_in_input_order() {
        let responses = vec!["abcde".to_owned(), "a".to_owned()];
        let records = compute_sentiment(&responses, &LengthScorer);
        assert_eq!(records[0], SentimentRecord { response: "abcde".to_owned(), polarity: 0.5 });
        assert_eq!(records[1].polarity, 0.1);

        let scorer: Box<dyn PolarityScorer> = Box::new(LexiconScorer::new());
        let records = compute_sentiment(&["great".to_owned()], scorer.as_ref());
        assert_eq!(records[0].polarity, 0.8);
    }

    #[test]
    fn top_n_follows_stable_sort() {
        let records = records(&[("a", 0.1), ("b", 0.5), ("c", -0.3), ("d", 0.5), ("e", 0.1)]);
        assert_eq!(responses(&top_positive(&records, 3)), vec!["b", "d", "a"]);
        assert_eq!(responses(&top_negative(&records, 3)), vec!["c", "a", "e"]);
        assert_eq!(top_positive(&records, 10).len(), 5);
        assert!(top_negative(&records, 0).is_empty());
        assert!(top_positive(&[], 3).is_empty());
    }

    #[test]
    fn histogram_bins() {
        let records = records(&[("a", -1.0), ("b", -0.95), ("c", 0.0), ("d", 0.99), ("e", 1.0)]);
        let histogram = polarity_histogram(&records, 10);
        assert_eq!(histogram.len(), 10);
        assert_eq!(histogram[0].lower, -1.0);
        assert_eq!(histogram[9].upper, 1.0);
        assert_eq!(histogram[0].count, 2);
        assert_eq!(histogram[5].count, 1);
        assert_eq!(histogram[9].count, 2);
        assert_eq!(histogram.iter().map(|bin| bin.count).sum::<usize>(), records.len());
        assert!(polarity_histogram(&records, 0).is_empty());
    }

    #[test]
    fn histogram_edges_are_inclusive_below() {
        let records = records(&[("annoying", -0.8), ("b", -0.4), ("smooth", 0.4), ("d", 0.6)]);
        let histogram = polarity_histogram(&records, 10);
        let counts: Vec<usize> = histogram.iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![0, 1, 0, 1, 0, 0, 0, 1, 1, 0]);
        assert_eq!(histogram[1].lower, -0.8);
        assert_eq!(histogram[6].upper, 0.4);
        assert_eq!(histogram[7].lower, 0.4);
        assert_eq!(histogram[1].upper, histogram[2].lower);
        assert_eq!(histogram[9].upper, 1.0);
    }

    #[test]
    fn summary() {
        let summary = SentimentSummary::from_records(&records(&[("a", 0.5), ("b", -0.25)]));
        assert_eq!(summary, SentimentSummary { responses: 2, average_polarity: Some(0.125) });
        assert_eq!(SentimentSummary::from_records(&[]).average_polarity, None);
    }
}
