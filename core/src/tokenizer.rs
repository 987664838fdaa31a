use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\b\w+\b").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the","be","to","of","and","a","in","that","have","i",
            "it","for","not","on","with","he","as","you","do","at",
            "this","but","his","by","from","they","we","say","her","she",
            "or","an","will","my","one","all","would","there","their","what",
            "so","up","out","if","about","who","get","which","go","me",
            "when","make","can","like","time","no","just","him","know","take",
            "people","into","year","your","good","some","could","them","see","other",
            "than","then","now","look","only","come","its","over","think","also",
            "back","after","use","two","how","our","work","first","well","way",
            "even","new","want","because","any","these","give","day","most","us",
        ];
        words.iter().copied().collect()
    };
}

const MIN_TERM_CHARS: usize = 3;

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Lowercase `text` and blank out everything that is not a letter or
/// whitespace, so "e.g." or "x2y" never fuse into a single token.
fn letters_only(text: &str) -> String {
    text.nfkc()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphabetic() || c.is_whitespace() { c } else { ' ' })
        .collect()
}

/// Raw tokens after case folding, punctuation removal, and the length and
/// stopword filters, before stemming.
pub fn raw_tokens(text: &str) -> Vec<String> {
    let cleaned = letters_only(text);
    WORD_RE
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

/// Snowball English stem of `word`. Words the stemmer cannot handle (anything
/// outside ASCII letters) come back lowercased and otherwise untouched.
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() || !lower.bytes().all(|b| b.is_ascii_lowercase()) {
        return lower;
    }
    let stemmed = STEMMER.stem(&lower);
    if stemmed.is_empty() { lower } else { stemmed.into_owned() }
}

/// Normalize text into index terms. Documents and queries both go through
/// this function, so it must stay deterministic.
pub fn tokenize(text: &str) -> Vec<String> {
    raw_tokens(text)
        .into_iter()
        .map(|t| stem(&t))
        .filter(|s| s.chars().count() >= MIN_TERM_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runners run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn punctuation_and_digits_split_words() {
        assert_eq!(raw_tokens("data-base abc123def"), vec!["data", "base", "abc", "def"]);
    }

    #[test]
    fn stem_falls_back_to_lowercase() {
        assert_eq!(stem("CAFÉS"), "cafés");
        assert_eq!(stem("Straße"), "straße");
        assert_eq!(stem(""), "");
    }
}
