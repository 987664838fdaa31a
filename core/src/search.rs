use crate::bm25;
use crate::error::Result;
use crate::index::{CorpusStats, IndexSnapshot};
use crate::persist::{self, IndexPaths};
use crate::snippet::snippet;
use crate::tokenizer::{raw_tokens, tokenize};
use crate::{DocId, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One ranked hit. Field names are part of the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub title: String,
    pub url: String,
    pub score: f64,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Matches before truncation to the limit.
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

/// Read-only query engine over a loaded index. Safe to share across threads
/// without locking; nothing is mutated after construction.
#[derive(Debug, Clone)]
pub struct Engine {
    index: IndexSnapshot,
}

impl Engine {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let index = persist::load(&IndexPaths::new(dir))?;
        Ok(Self::from_snapshot(index))
    }

    pub fn from_snapshot(index: IndexSnapshot) -> Self { Self { index } }

    pub fn stats(&self) -> CorpusStats { self.index.stats }

    pub fn document(&self, id: DocId) -> Option<&Document> { self.index.documents.get(&id) }

    /// Top `limit` results for `query`; a limit of 0 returns every match.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        Ok(self.search_page(query, limit)?.results)
    }

    pub fn search_page(&self, query: &str, limit: usize) -> Result<SearchPage> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok(SearchPage::default());
        }

        let highlights = snippet_terms(query, &terms);
        let ranked = bm25::rank(&self.index, &terms);
        let total_hits = ranked.len();
        let take = if limit == 0 { total_hits } else { limit };
        let results = ranked
            .into_iter()
            .take(take)
            .filter_map(|(id, score)| {
                let doc = self.index.documents.get(&id)?;
                Some(SearchResult {
                    doc_id: id,
                    title: doc.title.clone(),
                    url: doc.url.clone(),
                    score,
                    snippet: snippet(&doc.content, &highlights),
                })
            })
            .collect();
        Ok(SearchPage { total_hits, results })
    }
}

/// Normalized query terms, first occurrence order, without repeats.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query).into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// Words to look for when picking a snippet: the lowercased surface tokens
/// of the query, then any stems that differ from them ("city" stems to
/// "citi", which never occurs in running text).
pub fn snippet_terms(query: &str, stems: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw_tokens(query)
        .into_iter()
        .chain(stems.iter().cloned())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
