use crate::text::MIN_WORDS;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::LazyLock;

static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w[\w']+").expect("Hardcode regex pattern"));

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are",
        "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
        "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't", "do", "does", "doesn't",
        "doing", "don't", "down", "during", "each", "else", "ever", "few", "for", "from", "further", "get",
        "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "hence",
        "her", "here", "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "however", "http",
        "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself",
        "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
        "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out",
        "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should",
        "shouldn't", "since", "so", "some", "such", "than", "that", "that's", "the", "their", "theirs",
        "them", "themselves", "then", "there", "there's", "therefore", "these", "they", "they'd", "they'll",
        "they're", "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
        "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when",
        "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
        "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// A word and how often it occurs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// All responses as one blob separated by single spaces.
pub fn word_cloud_input<S: AsRef<str>>(responses: &[S]) -> String {
    responses.iter().map(|response| response.as_ref()).collect::<Vec<&str>>().join(" ")
}

/// Whether the blob has enough whitespace-separated tokens for a word cloud.
pub fn has_enough_words(blob: &str) -> bool {
    blob.split_whitespace().take(MIN_WORDS).count() >= MIN_WORDS
}

/// The most frequent words of the blob, stopwords and numbers excluded.
///
/// Words are lowercased and lose a trailing `'s`. Ties keep first appearance.
pub fn word_frequencies(blob: &str, max_words: usize) -> Vec<WordCount> {
    let mut order = Vec::<String>::new();
    let mut counts = HashMap::<String, usize>::new();
    let lowered = blob.to_lowercase();
    for token in WORD_PATTERN.find_iter(&lowered) {
        let word = token.as_str();
        if STOPWORDS.contains(word) {
            continue;
        }
        let word = word.strip_suffix("'s").unwrap_or(word);
        if word.chars().all(|c| c.is_numeric()) {
            continue;
        }
        match counts.get_mut(word) {
            Some(count) => *count += 1,
            None => {
                counts.insert(word.to_owned(), 1);
                order.push(word.to_owned());
            }
        }
    }
    let mut frequencies: Vec<WordCount> = order
        .into_iter()
        .map(|word| WordCount {
            count: counts[&word],
            word,
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies.truncate(max_words);
    frequencies
}
