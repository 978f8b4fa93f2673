use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w[\w']*").expect("Hardcode regex pattern"));

/// Scales polarity of a negated opinion word.
const NEGATION_FACTOR: f64 = -0.5;

/// Tokens after a negator that it can still reach.
const NEGATION_SCOPE: usize = 3;

/// Sentiment of a piece of text.
///
/// Implementations must be deterministic and return a polarity in `[-1, 1]`,
/// negative for negative sentiment.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> f64;
}

/// Rule-based English opinion lexicon.
///
/// Each opinion word carries a polarity; an intensifier right before it scales
/// the value and a negator shortly before it flips and dampens it. The text
/// polarity is the mean over the opinion words found, 0 when there are none.
pub struct LexiconScorer {
    opinions: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
    negators: Vec<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        LexiconScorer {
            opinions: Self::build_opinion_lexicon(),
            intensifiers: Self::build_intensifier_lexicon(),
            negators: vec![
                "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "without", "hardly", "barely",
                "cannot", "can't", "don't", "doesn't", "didn't", "isn't", "wasn't", "weren't", "aren't", "won't",
                "wouldn't", "shouldn't", "couldn't", "haven't", "hasn't",
            ],
        }
    }

    fn build_opinion_lexicon() -> HashMap<&'static str, f64> {
        [
            // Praise
            ("good", 0.7), ("great", 0.8), ("excellent", 1.0), ("amazing", 0.6), ("awesome", 1.0),
            ("fantastic", 0.4), ("wonderful", 1.0), ("perfect", 1.0), ("nice", 0.6), ("best", 1.0),
            ("better", 0.5), ("love", 0.5), ("loved", 0.7), ("enjoyed", 0.5), ("happy", 0.8),
            ("glad", 0.5), ("pleased", 0.5), ("proud", 0.8), ("fun", 0.3), ("positive", 0.2),
            // Teamwork
            ("helpful", 0.5), ("supportive", 0.5), ("collaborative", 0.4), ("productive", 0.4),
            ("efficient", 0.4), ("effective", 0.6), ("clear", 0.1), ("smooth", 0.4), ("easy", 0.4),
            ("useful", 0.3), ("valuable", 0.4), ("successful", 0.75), ("success", 0.3),
            ("improved", 0.4), ("improvement", 0.3), ("interesting", 0.5), ("fast", 0.2), ("quick", 0.3),
            ("friendly", 0.4), ("open", 0.1), ("safe", 0.5), ("motivated", 0.4), ("engaged", 0.3),
            // Complaints
            ("bad", -0.7), ("worse", -0.4), ("worst", -1.0), ("terrible", -1.0), ("awful", -1.0),
            ("horrible", -1.0), ("poor", -0.4), ("hard", -0.3), ("difficult", -0.5), ("confusing", -0.3),
            ("unclear", -0.3), ("slow", -0.3), ("late", -0.3), ("broken", -0.4), ("failed", -0.5),
            ("failure", -0.3), ("frustrating", -0.4), ("frustrated", -0.7), ("stressful", -0.5),
            ("stressed", -0.5), ("tired", -0.4), ("annoying", -0.8), ("boring", -1.0), ("sad", -0.5),
            ("unhappy", -0.6), ("wrong", -0.5), ("problem", -0.2), ("problems", -0.2), ("issue", -0.1),
            ("issues", -0.1), ("chaotic", -0.5), ("messy", -0.4), ("blocked", -0.3), ("overwhelmed", -0.5),
            ("lacking", -0.3), ("missing", -0.2), ("painful", -0.7), ("useless", -0.5), ("disappointing", -0.6),
        ]
        .into_iter()
        .collect()
    }

    fn build_intensifier_lexicon() -> HashMap<&'static str, f64> {
        [
            ("very", 1.3), ("really", 1.3), ("extremely", 1.5), ("incredibly", 1.5), ("super", 1.3),
            ("so", 1.2), ("too", 1.2), ("quite", 1.1), ("highly", 1.3), ("totally", 1.3),
            ("somewhat", 0.7), ("slightly", 0.5), ("fairly", 0.8), ("rather", 0.9), ("bit", 0.7),
        ]
        .into_iter()
        .collect()
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut scores = Vec::<f64>::new();
        let mut multiplier: Option<f64> = None;
        let mut negation_left = 0usize;
        for token in TOKEN_PATTERN.find_iter(&lowered).map(|token| token.as_str()) {
            if let Some(score) = self.opinions.get(token) {
                let mut score = *score * multiplier.take().unwrap_or(1.0);
                if negation_left > 0 {
                    score *= NEGATION_FACTOR;
                    negation_left = 0;
                }
                scores.push(score.clamp(-1.0, 1.0));
            } else if let Some(factor) = self.intensifiers.get(token) {
                multiplier = Some(multiplier.unwrap_or(1.0) * factor);
            } else if self.negators.iter().any(|negator| *negator == token) {
                negation_left = NEGATION_SCOPE + 1;
                multiplier = None;
            } else {
                multiplier = None;
            }
            negation_left = negation_left.saturating_sub(1);
        }
        if scores.is_empty() {
            return 0.0;
        }
        (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
    }
}
