use crate::DocId;
use std::path::PathBuf;

/// Errors surfaced by the indexing and search pipeline.
///
/// Malformed pages inside an archive are not errors; the extractor skips them
/// and counts them in [`crate::extract::ExtractStats`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode markup stream {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("binary index artifact is corrupt: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("index metadata is unreadable: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("index metadata is inconsistent: {0}")]
    InvalidMetadata(String),

    #[error("document {0} was already ingested")]
    DuplicateDocument(DocId),

    #[error("index has not been finalized")]
    NotFinalized,

    #[error("index is finalized and no longer accepts documents")]
    AlreadyFinalized,

    #[error("indexing workers stopped before the extractor finished")]
    QueueClosed,

    #[error("an indexing worker panicked")]
    WorkerPanicked,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
