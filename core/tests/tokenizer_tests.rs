use wikisearch_core::tokenizer::{stem, tokenize};

#[test]
fn it_drops_stopwords_short_tokens_and_punctuation() {
    assert_eq!(tokenize("The Quick, quick foxes!!"), vec!["quick", "quick", "fox"]);
}

#[test]
fn it_normalizes_and_stems() {
    let words = tokenize("Running Runners RUN! Connections connected.");
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"connect".to_string()));
    assert!(words.iter().all(|w| w.chars().count() > 2));
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn numbers_never_become_terms() {
    assert_eq!(tokenize("1984 2001 3.14"), Vec::<String>::new());
    assert_eq!(tokenize("abc1def"), vec!["abc", "def"]);
}

#[test]
fn composed_and_decomposed_forms_agree() {
    assert_eq!(tokenize("caf\u{e9} menu"), tokenize("cafe\u{301} menu"));
}

#[test]
fn stem_never_fails() {
    for word in ["", "ÜBER", "naïve", "日本語", "x"] {
        let out = stem(word);
        if !word.chars().all(|c| c.is_ascii_alphabetic()) || word.is_empty() {
            assert_eq!(out, word.to_lowercase());
        }
    }
}

#[test]
fn tokenize_is_deterministic() {
    let text = "Photosynthesis converts light energy into chemical energy in plants.";
    assert_eq!(tokenize(text), tokenize(text));
}
