//! BM25 Okapi scoring over an [`IndexSnapshot`].
//!
//! Candidates are the union of the query terms' postings; every candidate is
//! scored against all query terms and only positive scores survive.

use crate::index::IndexSnapshot;
use crate::{DocId, Document};
use std::collections::HashSet;

pub const K1: f64 = 1.2;
pub const B: f64 = 0.75;

/// `ln((N - df + 0.5) / (df + 0.5))`. Negative for terms in more than half
/// the corpus, which pushes such documents out of the results.
pub fn idf(doc_count: u32, df: usize) -> f64 {
    let n = doc_count as f64;
    let df = df as f64;
    ((n - df + 0.5) / (df + 0.5)).ln()
}

/// Contribution of one term to one document. With no average length to
/// normalize against, the length factor is 1 and the denominator is `tf + K1`.
pub fn term_score(idf: f64, tf: u32, doc_len: u32, avg_doc_len: f64) -> f64 {
    let tf = tf as f64;
    let length_norm = if avg_doc_len > 0.0 { (1.0 - B) + B * (doc_len as f64 / avg_doc_len) } else { 1.0 };
    idf * tf * (K1 + 1.0) / (tf + K1 * length_norm)
}

/// A query term that exists in the corpus, with its precomputed idf.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTerm<'a> {
    pub term: &'a str,
    pub idf: f64,
}

pub fn score_document(doc: &Document, terms: &[WeightedTerm<'_>], avg_doc_len: f64) -> f64 {
    terms
        .iter()
        .filter_map(|t| match doc.term_freq(t.term) {
            0 => None,
            tf => Some(term_score(t.idf, tf, doc.length(), avg_doc_len)),
        })
        .sum()
}

/// Rank every document matching at least one of `terms`. Output is sorted by
/// descending score, ties by ascending id, and holds positive scores only.
pub fn rank(index: &IndexSnapshot, terms: &[String]) -> Vec<(DocId, f64)> {
    let stats = index.stats;
    if terms.is_empty() || stats.doc_count == 0 {
        return Vec::new();
    }

    let weighted: Vec<WeightedTerm<'_>> = terms
        .iter()
        .filter_map(|term| match index.df(term) {
            0 => None,
            df => Some(WeightedTerm { term: term.as_str(), idf: idf(stats.doc_count, df) }),
        })
        .collect();

    let mut seen: HashSet<DocId> = HashSet::new();
    let mut candidates: Vec<DocId> = Vec::new();
    for t in &weighted {
        if let Some(ids) = index.postings.get(t.term) {
            candidates.extend(ids.iter().copied().filter(|id| seen.insert(*id)));
        }
    }

    let mut scored: Vec<(DocId, f64)> = candidates
        .into_iter()
        .filter_map(|id| {
            let doc = index.documents.get(&id)?;
            let score = score_document(doc, &weighted, stats.avg_doc_len);
            (score > 0.0).then_some((id, score))
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
}
