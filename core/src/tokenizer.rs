use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Token filtering policy. The same policy must be applied to corpus text and
/// query text, which is why the index owns its [`Tokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Tokens shorter than this many chars are dropped.
    pub min_token_len: usize,
    /// Drop tokens made only of digits.
    pub drop_numeric: bool,
    /// Remove common English stop words.
    pub stopwords: bool,
    /// Apply the Snowball English stemmer.
    pub stem: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { min_token_len: 1, drop_numeric: false, stopwords: false, stem: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self { Self { config } }

    pub fn config(&self) -> &TokenizerConfig { &self.config }

    /// Split `text` into normalized terms: NFKC, lowercase, maximal runs of
    /// letters and digits, then the configured filters.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let token = mat.as_str();
            if token.chars().count() < self.config.min_token_len { continue; }
            if self.config.drop_numeric && token.chars().all(|c| c.is_numeric()) { continue; }
            if self.config.stopwords && is_stopword(token) { continue; }
            if self.config.stem {
                tokens.push(STEMMER.stem(token).into_owned());
            } else {
                tokens.push(token.to_string());
            }
        }
        tokens
    }
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize with the default policy.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("The cat, the DOG; 42 birds!");
        assert_eq!(t, vec!["the", "cat", "the", "dog", "42", "birds"]);
    }

    #[test]
    fn splits_on_apostrophes_and_underscores() {
        let t = tokenize("runner's snake_case");
        assert_eq!(t, vec!["runner", "s", "snake", "case"]);
    }

    #[test]
    fn drops_numeric_and_short_tokens_when_configured() {
        let tok = Tokenizer::new(TokenizerConfig { min_token_len: 2, drop_numeric: true, ..Default::default() });
        assert_eq!(tok.tokenize("a 1999 year x9"), vec!["year", "x9"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ,;.!? ").is_empty());
    }
}
