//! Tokenization and stop-word filtering shared by the vectorizer paths.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Tokenizer settings. Cheap to copy; the stop-word list itself is a
/// process-wide immutable set initialized on first use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextProcessor {
    pub min_token_len: usize,
    pub filter_stop_words: bool,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            filter_stop_words: true,
        }
    }
}

impl TextProcessor {
    pub fn new(min_token_len: usize, filter_stop_words: bool) -> Self {
        Self {
            min_token_len,
            filter_stop_words,
        }
    }

    /// Lowercased word tokens, stop words and short tokens removed.
    ///
    /// Punctuation-only and empty input produce an empty token list; callers
    /// treat that as a defined zero vector, not an error.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let stops = english_stop_words();
        let mut tokens = Vec::new();

        for word in text.unicode_words() {
            let normalized = word.to_lowercase();
            if normalized.len() < self.min_token_len {
                continue;
            }
            if self.filter_stop_words && stops.contains(normalized.as_str()) {
                continue;
            }
            tokens.push(normalized);
        }

        tokens
    }

    /// Token n-grams joined with a single space, for `ngram_min..=ngram_max`.
    /// Stop words are removed before n-gram formation, so a bigram can span
    /// a removed stop word.
    pub fn ngrams(&self, text: &str, ngram_min: usize, ngram_max: usize) -> Vec<String> {
        let tokens = self.tokenize(text);
        let mut terms = Vec::new();

        for n in ngram_min..=ngram_max {
            if n == 0 || n > tokens.len() {
                continue;
            }
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                for window in tokens.windows(n) {
                    terms.push(window.join(" "));
                }
            }
        }

        terms
    }
}

/// The standard English stop-word list used by the vectorizers.
pub fn english_stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| {
        ENGLISH_STOP_WORDS.iter().copied().collect()
    })
}

// The classic 318-word English list used by most TF-IDF implementations.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against",
    "all", "almost", "alone", "along", "already", "also", "although", "always",
    "am", "among", "amongst", "amoungst", "amount", "an", "and", "another",
    "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
    "below", "beside", "besides", "between", "beyond", "bill", "both",
    "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
    "could", "couldnt", "cry", "de", "describe", "detail", "do", "done",
    "down", "due", "during", "each", "eg", "eight", "either", "eleven",
    "else", "elsewhere", "empty", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former",
    "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her",
    "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself",
    "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if",
    "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made",
    "many", "may", "me", "meanwhile", "might", "mill", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself",
    "name", "namely", "neither", "never", "nevertheless", "next", "nine",
    "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
    "over", "own", "part", "per", "perhaps", "please", "put", "rather", "re",
    "same", "see", "seem", "seemed", "seeming", "seems", "serious",
    "several", "she", "should", "show", "side", "since", "sincere", "six",
    "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten",
    "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon",
    "these", "they", "thick", "thin", "third", "this", "those", "though",
    "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever",
    "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];
