use crate::error::{Error, Result};
use crate::index::{CorpusStats, IndexSnapshot, Postings};
use crate::{DocId, Document};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

/// Human-readable summary written next to the binary artifacts. It is
/// written last and acts as the commit record for a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub doc_count: u32,
    pub avg_doc_len: f64,
    pub total_terms: u64,
    pub version: u32,
    #[serde(default)]
    pub created_at: String,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn metadata(&self) -> PathBuf { self.root.join("metadata.json") }
    pub fn documents(&self) -> PathBuf { self.root.join("documents.bin") }
    pub fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
}

/// Persist a finalized index. Every artifact goes to a temp file and is
/// renamed into place; metadata is renamed last.
pub fn save(paths: &IndexPaths, documents: &HashMap<DocId, Document>, postings: &Postings, stats: &CorpusStats) -> Result<()> {
    create_dir_all(&paths.root).map_err(|e| Error::io(&paths.root, e))?;

    write_replacing(&paths.documents(), |w| Ok(bincode::serialize_into(w, documents)?))?;
    write_replacing(&paths.postings(), |w| Ok(bincode::serialize_into(w, postings)?))?;

    let meta = MetaFile {
        doc_count: stats.doc_count,
        avg_doc_len: stats.avg_doc_len,
        total_terms: postings.len() as u64,
        version: FORMAT_VERSION,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
    };
    write_replacing(&paths.metadata(), |w| Ok(serde_json::to_writer_pretty(w, &meta)?))?;

    tracing::info!(root = %paths.root.display(), documents = meta.doc_count, terms = meta.total_terms, "index saved");
    Ok(())
}

pub fn save_snapshot(paths: &IndexPaths, snapshot: &IndexSnapshot) -> Result<()> {
    save(paths, &snapshot.documents, &snapshot.postings, &snapshot.stats)
}

/// Load and cross-check all three artifacts. Any missing, corrupt or
/// inconsistent artifact fails the whole load.
pub fn load(paths: &IndexPaths) -> Result<IndexSnapshot> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        return Err(Error::InvalidMetadata(format!("unsupported format version {}", meta.version)));
    }
    if !meta.avg_doc_len.is_finite() || meta.avg_doc_len < 0.0 {
        return Err(Error::InvalidMetadata(format!("invalid average document length {}", meta.avg_doc_len)));
    }

    let documents: HashMap<DocId, Document> = read_bincode(&paths.documents())?;
    let postings: Postings = read_bincode(&paths.postings())?;

    if documents.len() != meta.doc_count as usize {
        return Err(Error::InvalidMetadata(format!(
            "metadata lists {} documents, found {}",
            meta.doc_count,
            documents.len()
        )));
    }
    if postings.len() as u64 != meta.total_terms {
        return Err(Error::InvalidMetadata(format!(
            "metadata lists {} terms, found {}",
            meta.total_terms,
            postings.len()
        )));
    }
    if let Some((term, id)) = postings
        .iter()
        .find_map(|(term, ids)| ids.iter().find(|&&id| !documents.contains_key(&id)).map(|id| (term, id)))
    {
        return Err(Error::InvalidMetadata(format!("term {term:?} refers to unknown document {id}")));
    }

    tracing::info!(root = %paths.root.display(), documents = meta.doc_count, terms = meta.total_terms, "index loaded");
    Ok(IndexSnapshot {
        documents,
        postings,
        stats: CorpusStats { doc_count: meta.doc_count, avg_doc_len: meta.avg_doc_len },
    })
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.metadata();
    let mut f = File::open(&path).map_err(|e| Error::io(&path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| Error::io(&path, e))?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    let value = bincode::deserialize_from(BufReader::new(f))?;
    Ok(value)
}

fn write_replacing<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = path.with_extension("tmp");
    let f = File::create(&tmp).map_err(|e| Error::io(&tmp, e))?;
    let mut w = BufWriter::new(f);
    write(&mut w)?;
    w.flush().map_err(|e| Error::io(&tmp, e))?;
    let f = w.into_inner().map_err(|e| Error::io(&tmp, e.into_error()))?;
    f.sync_all().map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}
