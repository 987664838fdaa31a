use crate::{DocId, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// term -> ids of the documents containing it. A document id appears at most
/// once per term; order carries no meaning.
pub type Postings = HashMap<String, Vec<DocId>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub doc_count: u32,
    pub avg_doc_len: f64,
}

impl CorpusStats {
    pub fn compute<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut doc_count = 0u32;
        let mut total_len = 0u64;
        for doc in docs {
            doc_count += 1;
            total_len += doc.length() as u64;
        }
        let avg_doc_len = if doc_count > 0 { total_len as f64 / doc_count as f64 } else { 0.0 };
        Self { doc_count, avg_doc_len }
    }
}

/// A finished index: what gets persisted and what the engine serves from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub documents: HashMap<DocId, Document>,
    pub postings: Postings,
    pub stats: CorpusStats,
}

impl IndexSnapshot {
    /// Document frequency of `term`.
    pub fn df(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn total_terms(&self) -> usize { self.postings.len() }
}
