//! Review sentiment lexicon.
//!
//! Rule-based polarity scoring: each known word carries a prior polarity,
//! negations flip and dampen the next sentiment word, intensifiers scale
//! it, and the text's polarity is the mean of the matched words.

use super::PolarityModel;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::trace;

/// Multiplier applied to a negated sentiment word.
const NEGATION_FACTOR: f64 = -0.5;

/// Plain tokens a negation can skip before it stops applying.
const NEGATION_REACH: usize = 2;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"[a-z0-9]+(?:'[a-z0-9]+)*").expect("valid token pattern"))
}

/// Word-level sentiment lexicon for product and app reviews.
#[derive(Debug, Clone)]
pub struct ReviewLexicon {
    /// Word to prior polarity mapping.
    words: HashMap<String, f64>,
    /// Words that invert the next sentiment word.
    negations: HashSet<String>,
    /// Words that scale the next sentiment word.
    intensifiers: HashMap<String, f64>,
}

impl Default for ReviewLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewLexicon {
    /// Create a lexicon with the built-in vocabulary.
    pub fn new() -> Self {
        let positive_words = [
            ("excellent", 1.0),
            ("perfect", 1.0),
            ("outstanding", 0.9),
            ("amazing", 0.9),
            ("awesome", 0.9),
            ("fantastic", 0.9),
            ("wonderful", 0.9),
            ("brilliant", 0.9),
            ("superb", 0.9),
            ("best", 0.9),
            ("love", 0.8),
            ("loved", 0.8),
            ("loves", 0.8),
            ("great", 0.8),
            ("delightful", 0.8),
            ("impressive", 0.7),
            ("good", 0.7),
            ("happy", 0.7),
            ("enjoy", 0.6),
            ("enjoyed", 0.6),
            ("beautiful", 0.7),
            ("pleased", 0.6),
            ("recommend", 0.6),
            ("recommended", 0.6),
            ("helpful", 0.6),
            ("reliable", 0.6),
            ("smooth", 0.5),
            ("fast", 0.4),
            ("quick", 0.4),
            ("easy", 0.4),
            ("intuitive", 0.5),
            ("useful", 0.5),
            ("nice", 0.5),
            ("clean", 0.4),
            ("friendly", 0.5),
            ("stable", 0.4),
            ("better", 0.5),
            ("works", 0.3),
            ("worth", 0.4),
            ("satisfied", 0.5),
            ("fine", 0.2),
            ("decent", 0.2),
            ("okay", 0.1),
            ("ok", 0.1),
        ];

        let negative_words = [
            ("terrible", -1.0),
            ("horrible", -1.0),
            ("awful", -1.0),
            ("worst", -1.0),
            ("useless", -0.9),
            ("garbage", -0.9),
            ("hate", -0.8),
            ("hated", -0.8),
            ("scam", -0.9),
            ("broken", -0.7),
            ("bad", -0.7),
            ("poor", -0.6),
            ("disappointing", -0.7),
            ("disappointed", -0.7),
            ("annoying", -0.6),
            ("frustrating", -0.7),
            ("crash", -0.6),
            ("crashes", -0.6),
            ("crashed", -0.6),
            ("crashing", -0.6),
            ("bug", -0.4),
            ("bugs", -0.4),
            ("buggy", -0.6),
            ("glitch", -0.4),
            ("glitchy", -0.5),
            ("freezes", -0.5),
            ("laggy", -0.5),
            ("slow", -0.4),
            ("confusing", -0.5),
            ("expensive", -0.3),
            ("waste", -0.7),
            ("worse", -0.6),
            ("fails", -0.6),
            ("failed", -0.6),
            ("error", -0.4),
            ("errors", -0.4),
            ("problem", -0.4),
            ("problems", -0.4),
            ("issue", -0.3),
            ("issues", -0.3),
            ("unusable", -0.9),
            ("refund", -0.4),
            ("uninstalled", -0.6),
            ("meh", -0.2),
        ];

        let words = positive_words
            .into_iter()
            .chain(negative_words)
            .map(|(word, score)| (word.to_string(), score))
            .collect();

        let negations = [
            "not", "no", "never", "neither", "nor", "nothing", "none", "nobody", "cannot", "can't",
            "cant", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont",
            "wouldn't", "wouldnt", "isn't", "isnt", "aren't", "arent", "wasn't", "wasnt",
            "weren't", "werent", "hardly", "barely", "without",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let intensifiers = [
            ("very", 1.3),
            ("really", 1.3),
            ("so", 1.2),
            ("super", 1.4),
            ("extremely", 1.5),
            ("incredibly", 1.5),
            ("absolutely", 1.4),
            ("totally", 1.3),
            ("highly", 1.3),
            ("quite", 1.1),
            ("slightly", 0.5),
            ("somewhat", 0.7),
            ("kinda", 0.7),
            ("fairly", 0.8),
        ]
        .into_iter()
        .map(|(word, mult)| (word.to_string(), mult))
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Add or override a word's prior polarity.
    pub fn add_word(&mut self, word: &str, score: f64) {
        self.words
            .insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
    }

    /// Get the prior polarity of a word.
    pub fn get_score(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    /// Check if a word is a negation.
    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word)
    }

    /// Get an intensifier multiplier.
    pub fn get_intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    /// Number of scored words in the lexicon.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Score a text.
    pub fn analyze(&self, text: &str) -> LexiconResult {
        let normalized = text.to_lowercase().replace('\u{2019}', "'");
        let mut matches = Vec::new();
        let mut token_count = 0;

        let mut negation_window = 0usize;
        let mut intensity: Option<f64> = None;

        for token in token_regex().find_iter(&normalized) {
            let word = token.as_str();
            token_count += 1;

            if self.is_negation(word) {
                negation_window = NEGATION_REACH + 1;
                continue;
            }

            if let Some(mult) = self.get_intensifier(word) {
                intensity = Some(mult);
                continue;
            }

            match self.get_score(word) {
                Some(prior) => {
                    let mut score = prior * intensity.unwrap_or(1.0);
                    if negation_window > 0 {
                        score *= NEGATION_FACTOR;
                    }
                    matches.push(LexiconMatch {
                        word: word.to_string(),
                        score,
                    });
                    negation_window = 0;
                    intensity = None;
                }
                None => {
                    intensity = None;
                    negation_window = negation_window.saturating_sub(1);
                }
            }
        }

        let score = if matches.is_empty() {
            0.0
        } else {
            matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64
        };

        LexiconResult {
            score: score.clamp(-1.0, 1.0),
            matches,
            token_count,
        }
    }
}

/// A lexicon word found in a text.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconMatch {
    pub word: String,
    /// Contribution after negation and intensifiers.
    pub score: f64,
}

/// Result from lexicon-based analysis.
#[derive(Debug, Clone)]
pub struct LexiconResult {
    /// Overall polarity (-1 to 1).
    pub score: f64,
    /// Sentiment words found, in text order.
    pub matches: Vec<LexiconMatch>,
    /// Number of tokens in the text.
    pub token_count: usize,
}

/// Default polarity model backed by [`ReviewLexicon`].
#[derive(Debug, Clone, Default)]
pub struct LexiconModel {
    lexicon: ReviewLexicon,
}

impl LexiconModel {
    /// Built-in lexicon extended with custom word scores.
    pub fn with_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let mut lexicon = ReviewLexicon::new();
        for (word, score) in words {
            lexicon.add_word(word, *score);
        }
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &ReviewLexicon {
        &self.lexicon
    }
}

impl PolarityModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn polarity(&self, text: &str) -> f64 {
        let result = self.lexicon.analyze(text);
        trace!(
            "{} tokens, matched [{}] -> {:.3}",
            result.token_count,
            result
                .matches
                .iter()
                .map(|m| format!("{}={:.2}", m.word, m.score))
                .collect::<Vec<_>>()
                .join(", "),
            result.score
        );
        result.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_words() {
        let lexicon = ReviewLexicon::new();
        assert!(lexicon.get_score("great").unwrap() > 0.0);
        assert!(lexicon.get_score("terrible").unwrap() < 0.0);
        assert!(lexicon.get_score("app").is_none());
        assert!(lexicon.is_negation("don't"));
        assert!(!lexicon.is_negation("great"));
    }

    #[test]
    fn test_analyze_positive() {
        let result = ReviewLexicon::new().analyze("Great app!");
        assert!(result.score > 0.1);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.token_count, 2);
    }

    #[test]
    fn test_analyze_negative() {
        let result = ReviewLexicon::new().analyze("Terrible, crashes constantly");
        assert!(result.score < -0.1);
        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn test_analyze_lukewarm_is_not_positive() {
        let result = ReviewLexicon::new().analyze("It's okay I guess");
        assert!(result.score <= 0.1);
        assert!(result.score >= -0.1);
    }

    #[test]
    fn test_no_matches_scores_zero() {
        let lexicon = ReviewLexicon::new();
        assert_eq!(lexicon.analyze("").score, 0.0);
        assert_eq!(lexicon.analyze("the app opened").score, 0.0);
        assert_eq!(lexicon.analyze("").token_count, 0);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let lexicon = ReviewLexicon::new();
        let plain = lexicon.analyze("good");
        let negated = lexicon.analyze("not good");
        assert!(plain.score > 0.0);
        assert!(negated.score < 0.0);
        assert!(negated.score.abs() < plain.score.abs());
        assert!(lexicon.analyze("not bad at all").score > 0.0);
    }

    #[test]
    fn test_negation_reach_is_limited() {
        let lexicon = ReviewLexicon::new();
        assert!(lexicon.analyze("isn't a good app").score < 0.0);
        assert!(lexicon.analyze("no idea why people say it is good").score > 0.0);
    }

    #[test]
    fn test_curly_apostrophe_negation() {
        let lexicon = ReviewLexicon::new();
        assert!(lexicon.analyze("doesn\u{2019}t feel reliable").score < 0.0);
    }

    #[test]
    fn test_intensifier_scales() {
        let lexicon = ReviewLexicon::new();
        let normal = lexicon.analyze("good app");
        let intensified = lexicon.analyze("very good app");
        let softened = lexicon.analyze("slightly good app");
        assert!(intensified.score > normal.score);
        assert!(softened.score < normal.score);
    }

    #[test]
    fn test_score_is_clamped() {
        let result = ReviewLexicon::new().analyze("absolutely perfect, extremely excellent");
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_deterministic() {
        let model = LexiconModel::default();
        let text = "Love the design but it crashes on startup";
        assert_eq!(model.polarity(text), model.polarity(text));
    }

    #[test]
    fn test_custom_words_override() {
        let custom: HashMap<String, f64> = [
            ("snappy".to_string(), 0.6),
            ("slow".to_string(), -0.9),
            ("rad".to_string(), 3.0),
        ]
        .into_iter()
        .collect();

        let model = LexiconModel::with_words(&custom);
        assert!(model.polarity("so snappy") > 0.1);
        assert_eq!(model.lexicon().get_score("slow"), Some(-0.9));
        assert_eq!(model.lexicon().get_score("rad"), Some(1.0));
        assert_eq!(model.name(), "lexicon");
    }
}
