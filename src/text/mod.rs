//! # Text Module
//!
//! Free-text reflections: picking the long-form columns, cleaning responses,
//! scoring their polarity and preparing word-cloud input.
pub(crate) mod lexicon;
pub(crate) mod responses;
pub(crate) mod sentiment;
pub(crate) mod words;

pub use lexicon::LexiconScorer;
pub use lexicon::PolarityScorer;
pub use responses::column_responses;
pub use responses::long_form_columns;
pub use responses::select_text_responses;
pub use sentiment::compute_sentiment;
pub use sentiment::polarity_histogram;
pub use sentiment::top_negative;
pub use sentiment::top_positive;
pub use sentiment::HistogramBin;
pub use sentiment::SentimentRecord;
pub use sentiment::SentimentSummary;
pub use words::has_enough_words;
pub use words::word_cloud_input;
pub use words::word_frequencies;
pub use words::WordCount;

/// Mean character length a column must exceed to count as free text.
pub const LONG_FORM_THRESHOLD: f64 = 30.0;

/// Fewest whitespace tokens worth a word cloud.
pub const MIN_WORDS: usize = 2;

/// Words kept for the word cloud.
pub const MAX_WORDS: usize = 200;

pub const HISTOGRAM_BINS: usize = 10;
