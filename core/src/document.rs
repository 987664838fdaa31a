use crate::tokenizer::tokenize;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A cleaned article ready for indexing.
///
/// `terms` and `length` are derived once in [`Document::new`]; the title is
/// counted twice as a cheap relevance boost, so `length` always equals the sum
/// of the term frequencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    pub content: String,
    terms: HashMap<String, u32>,
    length: u32,
}

impl Document {
    pub fn new(id: DocId, title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        let title = title.into();
        let content = content.into();
        let mut terms: HashMap<String, u32> = HashMap::new();
        let mut length = 0u32;
        for term in tokenize(&format!("{title} {title} {content}")) {
            *terms.entry(term).or_insert(0) += 1;
            length += 1;
        }
        Self { id, title, url: url.into(), content, terms, length }
    }

    pub fn term_freq(&self, term: &str) -> u32 {
        self.terms.get(term).copied().unwrap_or(0)
    }

    pub fn terms(&self) -> &HashMap<String, u32> { &self.terms }

    /// Number of indexed terms, counting repeats.
    pub fn length(&self) -> u32 { self.length }
}
