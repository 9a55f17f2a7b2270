use docsim_core::tokenizer::{tokenize, Tokenizer, TokenizerConfig};

#[test]
fn it_normalizes_and_lowercases() {
    let words = tokenize("Running RUNNERS run! The café's menu.");
    assert!(words.contains(&"running".to_string()));
    assert!(words.contains(&"runners".to_string()));
    // NFKC keeps the composed form, lowercasing is applied after
    assert!(words.contains(&"café".to_string()));
    // Full-width digits fold to ASCII
    assert_eq!(tokenize("ＡＢＣ１２３"), vec!["abc123"]);
}

#[test]
fn it_stems_when_enabled() {
    let tok = Tokenizer::new(TokenizerConfig { stem: true, ..Default::default() });
    let words = tok.tokenize("Running Runners RUN");
    assert_eq!(words.iter().filter(|w| w.as_str() == "run").count(), 2);
}

#[test]
fn it_filters_stopwords_when_enabled() {
    let tok = Tokenizer::new(TokenizerConfig { stopwords: true, ..Default::default() });
    let words = tok.tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"fox".to_string()));
}

#[test]
fn default_policy_keeps_stopwords() {
    let words = tokenize("The quick brown fox");
    assert_eq!(words, vec!["the", "quick", "brown", "fox"]);
}

#[test]
fn it_is_a_pure_function() {
    let text = "Same input, same output.";
    assert_eq!(tokenize(text), tokenize(text));
}
