//! Concurrent index construction.
//!
//! One producer (the extractor, or any document iterator) feeds a bounded
//! queue; a fixed pool of workers drains it and inserts into the shared index
//! under a single lock. Each ingest call waits for the pool to fully drain.

use crate::config::BuildConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::extract::{ExtractStats, Extractor};
use crate::index::{CorpusStats, IndexSnapshot, Postings};
use crate::persist::{self, IndexPaths};
use crate::DocId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

#[derive(Default)]
struct BuildState {
    documents: HashMap<DocId, Document>,
    postings: Postings,
}

/// Receiving half of the queue, shared by the workers. The last worker to
/// exit drops the receiver so the producer's next send fails instead of
/// blocking on a full queue nobody drains.
struct WorkQueue {
    rx: Mutex<Option<Receiver<Document>>>,
    live: AtomicUsize,
}

impl WorkQueue {
    fn new(rx: Receiver<Document>, workers: usize) -> Self {
        Self { rx: Mutex::new(Some(rx)), live: AtomicUsize::new(workers) }
    }

    fn recv(&self) -> Option<Document> {
        self.rx.lock().as_ref()?.recv().ok()
    }
}

/// Held by a worker for its whole life, including unwinding after a panic.
struct WorkerExit<'a>(&'a WorkQueue);

impl Drop for WorkerExit<'_> {
    fn drop(&mut self) {
        if self.0.live.fetch_sub(1, Ordering::AcqRel) == 1 {
            drop(self.0.rx.lock().take());
        }
    }
}

fn enqueue(tx: &SyncSender<Document>, doc: Document) -> Result<()> {
    tx.send(doc).map_err(|_| Error::QueueClosed)
}

pub struct IndexBuilder {
    config: BuildConfig,
    state: Mutex<BuildState>,
    next_id: DocId,
    extract_stats: ExtractStats,
    stats: Option<CorpusStats>,
}

impl IndexBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BuildState::default()),
            next_id: 1,
            extract_stats: ExtractStats::default(),
            stats: None,
        }
    }

    pub fn config(&self) -> &BuildConfig { &self.config }

    pub fn doc_count(&self) -> usize { self.state.lock().documents.len() }

    /// Extraction counters summed over every file ingested so far.
    pub fn extract_stats(&self) -> &ExtractStats { &self.extract_stats }

    /// Corpus statistics, available once [`finalize`](Self::finalize) ran.
    pub fn stats(&self) -> Option<CorpusStats> { self.stats }

    /// Extract `path` and index every accepted page. Document ids continue
    /// from the previous file so they stay unique across the whole build.
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<ExtractStats> {
        let path = path.as_ref();
        let mut extractor = Extractor::new(self.config.url_base.clone()).starting_at(self.next_id);
        let result = self.run_pool(|tx| {
            extractor.extract_file(path, |doc| enqueue(tx, doc))
        });

        self.next_id = extractor.next_id();
        let file_stats = *extractor.stats();
        self.extract_stats.merge(&file_stats);
        result?;

        tracing::info!(
            path = %path.display(),
            pages = file_stats.pages,
            emitted = file_stats.emitted,
            rejected = file_stats.rejected(),
            malformed = file_stats.malformed,
            "ingested file"
        );
        Ok(file_stats)
    }

    /// Index already-built documents through the same worker pool.
    pub fn ingest_documents<I>(&mut self, docs: I) -> Result<usize>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut max_id: Option<DocId> = None;
        let sent = self.run_pool(|tx| {
            let mut sent = 0usize;
            for doc in docs {
                max_id = Some(max_id.map_or(doc.id, |m| m.max(doc.id)));
                enqueue(tx, doc)?;
                sent += 1;
            }
            Ok(sent)
        });
        if let Some(max_id) = max_id {
            self.next_id = self.next_id.max(max_id.saturating_add(1));
        }
        sent
    }

    /// Compute corpus statistics over everything ingested. Closes the build
    /// phase: further ingestion is refused.
    pub fn finalize(&mut self) -> Result<CorpusStats> {
        if self.stats.is_some() {
            return Err(Error::AlreadyFinalized);
        }
        let state = self.state.get_mut();
        let stats = CorpusStats::compute(state.documents.values());
        tracing::info!(
            documents = stats.doc_count,
            terms = state.postings.len(),
            avg_doc_len = stats.avg_doc_len,
            "index finalized"
        );
        self.stats = Some(stats);
        Ok(stats)
    }

    /// Write the finalized index under `dir`.
    pub fn persist(&self, dir: impl AsRef<Path>) -> Result<()> {
        let stats = self.stats.ok_or(Error::NotFinalized)?;
        let state = self.state.lock();
        persist::save(&IndexPaths::new(dir), &state.documents, &state.postings, &stats)
    }

    pub fn into_snapshot(self) -> Result<IndexSnapshot> {
        let stats = self.stats.ok_or(Error::NotFinalized)?;
        let state = self.state.into_inner();
        Ok(IndexSnapshot { documents: state.documents, postings: state.postings, stats })
    }

    /// Spawn the worker pool, run `produce` on the calling thread, then wait
    /// for the workers to drain the queue and exit. A worker panic takes
    /// precedence over the `QueueClosed` the producer sees as a consequence.
    fn run_pool<T, P>(&self, produce: P) -> Result<T>
    where
        P: FnOnce(&SyncSender<Document>) -> Result<T>,
    {
        if self.stats.is_some() {
            return Err(Error::AlreadyFinalized);
        }
        let workers = self.config.effective_workers();
        let (tx, rx) = mpsc::sync_channel::<Document>(self.config.effective_queue_capacity());
        let queue = WorkQueue::new(rx, workers);
        let failure: Mutex<Option<Error>> = Mutex::new(None);

        thread::scope(|scope| {
            let (queue, failure) = (&queue, &failure);
            let workers: Vec<_> = (0..workers)
                .map(|_| scope.spawn(move || self.drain(queue, failure)))
                .collect();

            let produced = produce(&tx);
            drop(tx);

            let mut panicked = false;
            for worker in workers {
                panicked |= worker.join().is_err();
            }
            if panicked {
                return Err(Error::WorkerPanicked);
            }
            if let Some(err) = failure.lock().take() {
                return Err(err);
            }
            produced
        })
    }

    /// Worker loop. A failed insert is recorded and the worker keeps
    /// draining so the producer never blocks on a dead pool.
    fn drain(&self, queue: &WorkQueue, failure: &Mutex<Option<Error>>) {
        let _exit = WorkerExit(queue);
        while let Some(doc) = queue.recv() {
            if let Err(err) = self.insert(doc) {
                failure.lock().get_or_insert(err);
            }
        }
    }

    fn insert(&self, doc: Document) -> Result<()> {
        let mut state = self.state.lock();
        if state.documents.contains_key(&doc.id) {
            return Err(Error::DuplicateDocument(doc.id));
        }
        for term in doc.terms().keys() {
            state.postings.entry(term.clone()).or_default().push(doc.id);
        }
        state.documents.insert(doc.id, doc);
        let count = state.documents.len();
        if count % 1000 == 0 {
            tracing::debug!(documents = count, "indexing progress");
        }
        Ok(())
    }
}

impl Default for IndexBuilder {
    fn default() -> Self { Self::new(BuildConfig::default()) }
}
