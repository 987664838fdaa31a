use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;
use wikisearch_core::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_URL_BASE, DEFAULT_WORKERS};
use wikisearch_core::{BuildConfig, IndexBuilder};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a BM25 search index from MediaWiki XML dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a dump file or a directory of dumps (.xml / .bz2)
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long, default_value = "./index")]
        output: String,
        /// Number of indexing worker threads
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
        /// Capacity of the queue between the extractor and the workers
        #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
        queue_capacity: usize,
        /// Prefix for document URLs
        #[arg(long, default_value = DEFAULT_URL_BASE)]
        url_base: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, workers, queue_capacity, url_base } => {
            let config = BuildConfig::default()
                .with_workers(workers)
                .with_queue_capacity(queue_capacity)
                .with_url_base(url_base);
            build_index(Path::new(&input), Path::new(&output), config)
        }
    }
}

fn build_index(input: &Path, output: &Path, config: BuildConfig) -> Result<()> {
    let files = collect_inputs(input)?;
    if files.is_empty() {
        bail!("no .xml or .bz2 dumps found under {}", input.display());
    }
    tracing::info!(files = files.len(), workers = config.workers, output = %output.display(), "starting build");

    let mut builder = IndexBuilder::new(config);
    for file in &files {
        tracing::info!(file = %file.display(), "processing file");
        builder
            .ingest_file(file)
            .with_context(|| format!("ingesting {}", file.display()))?;
    }

    let stats = builder.finalize().context("finalizing index")?;
    let totals = builder.extract_stats();
    tracing::info!(
        documents = stats.doc_count,
        avg_doc_len = stats.avg_doc_len,
        pages = totals.pages,
        rejected = totals.rejected(),
        malformed = totals.malformed,
        "index built"
    );

    builder
        .persist(output)
        .with_context(|| format!("saving index to {}", output.display()))?;
    tracing::info!(output = %output.display(), "index build complete");
    Ok(())
}

/// Dumps to ingest, in a stable order.
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input path {} does not exist", input.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry.with_context(|| format!("walking {}", input.display()))?;
        let p = entry.path();
        if p.is_file() && is_dump(p) {
            files.push(p.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn is_dump(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("xml" | "bz2"))
}
