//! Lexicon sentiment over headline text.
//!
//! Word valences are summed per headline, a negator flips and damps the
//! next scored word, and the sum is squashed into [-1, 1] with
//! `x / sqrt(x² + 15)`. The scan uses the mean over a fixed set of
//! headlines, not live news.

use std::collections::HashMap;

const NORMALIZATION_ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
/// Words after a negator that can still be flipped by it.
const NEGATION_REACH: usize = 3;

const LEXICON: &[(&str, f64)] = &[
    ("gain", 2.4),
    ("gains", 2.4),
    ("surge", 2.3),
    ("surges", 2.3),
    ("rally", 2.2),
    ("rallies", 2.2),
    ("strong", 2.3),
    ("growth", 2.1),
    ("profit", 2.0),
    ("profits", 2.0),
    ("beat", 1.6),
    ("beats", 1.6),
    ("record", 1.4),
    ("upgrade", 1.9),
    ("bullish", 2.5),
    ("optimism", 2.4),
    ("optimistic", 2.3),
    ("positive", 2.3),
    ("expansion", 1.5),
    ("robust", 2.0),
    ("boost", 1.9),
    ("rise", 1.4),
    ("rises", 1.4),
    ("high", 0.9),
    ("loss", -2.1),
    ("losses", -2.1),
    ("fall", -1.5),
    ("falls", -1.5),
    ("drop", -1.4),
    ("drops", -1.4),
    ("plunge", -2.6),
    ("plunges", -2.6),
    ("weak", -1.9),
    ("slump", -2.2),
    ("downgrade", -1.9),
    ("bearish", -2.5),
    ("concern", -1.4),
    ("concerns", -1.4),
    ("uncertainty", -1.4),
    ("cautious", -0.8),
    ("risk", -1.1),
    ("risks", -1.1),
    ("selloff", -2.3),
    ("fraud", -3.0),
    ("default", -2.0),
    ("miss", -1.5),
    ("misses", -1.5),
    ("decline", -1.6),
    ("declines", -1.6),
    ("pressure", -1.2),
    ("volatile", -1.0),
];

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly", "isnt", "wont", "dont"];

/// Fixed sample headlines used when configuration supplies none.
pub const SAMPLE_HEADLINES: &[&str] = &[
    "Markets rally as strong quarterly earnings beat expectations",
    "Foreign investors boost holdings in Indian equities",
    "Analysts remain cautious amid global uncertainty",
    "Banking stocks rise on robust credit growth",
    "Metal shares drop on weak demand concerns",
];

/// Word-valence sentiment scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    /// Compound score of one text in [-1, 1].
    pub fn score(&self, text: &str) -> f64 {
        let mut sum = 0.0;
        let mut negated_for = 0usize;

        for word in tokenize(text) {
            if NEGATORS.contains(&word.as_str()) {
                negated_for = NEGATION_REACH;
                continue;
            }
            if let Some(valence) = self.lexicon.get(word.as_str()) {
                sum += if negated_for > 0 {
                    negated_for = 0;
                    valence * NEGATION_SCALAR
                } else {
                    *valence
                };
            } else {
                negated_for = negated_for.saturating_sub(1);
            }
        }

        normalize(sum)
    }

    /// Mean compound score; `None` when there is nothing to score.
    pub fn mean_score<S: AsRef<str>>(&self, texts: &[S]) -> Option<f64> {
        if texts.is_empty() {
            return None;
        }
        let total: f64 = texts.iter().map(|t| self.score(t.as_ref())).sum();
        Some(total / texts.len() as f64)
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.replace('\'', "").to_lowercase())
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_and_negative() {
        let scorer = LexiconScorer::new();

        assert!(scorer.score("Profits surge on strong demand") > 0.5);
        assert!(scorer.score("Shares plunge after fraud probe") < -0.5);
        assert_eq!(scorer.score("Board meets on Tuesday"), 0.0);
    }

    #[test]
    fn test_normalization() {
        let scorer = LexiconScorer::new();
        // single word: 2.4 / sqrt(2.4² + 15)
        let expected = 2.4 / (2.4f64 * 2.4 + 15.0).sqrt();
        assert!((scorer.score("gain") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_negation_flips() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("results were not strong") < 0.0);
        assert!(scorer.score("Outlook isn't positive") < 0.0);
        assert!(scorer.score("no losses reported") > 0.0);
    }

    #[test]
    fn test_mean_score() {
        let scorer = LexiconScorer::new();
        assert!(scorer.mean_score::<&str>(&[]).is_none());

        let mean = scorer.mean_score(SAMPLE_HEADLINES).unwrap();
        assert!(mean > 0.05);
        assert!(mean < 1.0);
    }
}
