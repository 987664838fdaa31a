//! Full-text search over encyclopedia article dumps.
//!
//! The pipeline is: [`extract`] streams pages out of a (optionally bzip2
//! compressed) XML dump, [`builder`] indexes them on a worker pool,
//! [`persist`] writes the finished snapshot, and [`search`] loads it back and
//! answers BM25-ranked queries.

pub mod bm25;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod index;
pub mod persist;
pub mod search;
pub mod snippet;
pub mod tokenizer;

pub use builder::IndexBuilder;
pub use config::BuildConfig;
pub use document::Document;
pub use error::{Error, Result};
pub use index::{CorpusStats, IndexSnapshot, Postings};
pub use search::{Engine, SearchPage, SearchResult};

pub type DocId = u32;
