use regex::{Regex, RegexBuilder};

// Window size in chars around the first match.
const BEFORE: usize = 100;
const AFTER: usize = 200;

/// Words of the raw query, used for locating and highlighting matches.
pub fn query_words(query: &str) -> Vec<&str> {
    query.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect()
}

fn words_regex(words: &[&str]) -> Option<Regex> {
    if words.is_empty() { return None; }
    let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
    RegexBuilder::new(&format!(r"\b(?:{alternation})\b")).case_insensitive(true).build().ok()
}

/// Up to `BEFORE` chars before the first query-word match, the match itself
/// and up to `AFTER` chars after it, with matches wrapped in `<em>`. Falls back
/// to the leading `BEFORE + AFTER` chars when nothing matches.
pub fn snippet(text: &str, words: &[&str]) -> Option<String> {
    if text.is_empty() { return None; }
    let re = words_regex(words);
    let window = match re.as_ref().and_then(|re| re.find(text)) {
        Some(m) => {
            let start = text[..m.start()].char_indices().rev().nth(BEFORE - 1).map(|(i, _)| i).unwrap_or(0);
            let end = text[m.end()..].char_indices().nth(AFTER).map(|(i, _)| m.end() + i).unwrap_or(text.len());
            &text[start..end]
        }
        None => {
            let end = text.char_indices().nth(BEFORE + AFTER).map(|(i, _)| i).unwrap_or(text.len());
            &text[..end]
        }
    };
    Some(match re {
        Some(re) => re.replace_all(window, "<em>$0</em>").into_owned(),
        None => window.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_whole_words_case_insensitively() {
        let s = snippet("The Cat sat on the concatenated mat", &["cat"]).unwrap();
        assert_eq!(s, "The <em>Cat</em> sat on the concatenated mat");
    }

    #[test]
    fn window_is_measured_in_chars() {
        let text = format!("{} needle {}", "é".repeat(150), "ü".repeat(300));
        let s = snippet(&text, &["needle"]).unwrap();
        let expected = format!("{} <em>needle</em> {}", "é".repeat(99), "ü".repeat(199));
        assert_eq!(s, expected);
    }

    #[test]
    fn long_match_is_kept_whole() {
        let word = "a".repeat(250);
        let text = format!("start {word} tail");
        let s = snippet(&text, &[word.as_str()]).unwrap();
        assert_eq!(s, format!("start <em>{word}</em> tail"));
    }

    #[test]
    fn no_match_returns_prefix() {
        let s = snippet("short text", &["zzz"]).unwrap();
        assert_eq!(s, "short text");
        let long = "x".repeat(500);
        assert_eq!(snippet(&long, &["zzz"]).unwrap().chars().count(), BEFORE + AFTER);
        assert_eq!(snippet("", &["a"]), None);
    }

    #[test]
    fn splits_query_into_words() {
        assert_eq!(query_words("cat, sat!  (dog)"), vec!["cat", "sat", "dog"]);
    }
}
