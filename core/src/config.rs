
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;
pub const DEFAULT_URL_BASE: &str = "https://en.wikipedia.org/wiki/";

/// Tunables for a single index build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Number of worker threads draining the document queue.
    pub workers: usize,
    /// Capacity of the bounded queue between the extractor and the workers.
    pub queue_capacity: usize,
    /// Prefix joined with the underscored page title to form a document URL.
    pub url_base: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            url_base: DEFAULT_URL_BASE.to_string(),
        }
    }
}

impl BuildConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    pub(crate) fn effective_workers(&self) -> usize { self.workers.max(1) }

    pub(crate) fn effective_queue_capacity(&self) -> usize { self.queue_capacity.max(1) }
}
