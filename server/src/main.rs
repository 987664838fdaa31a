use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};
use wikisearch_core::Engine;

#[derive(Parser)]
#[command(name = "server", about = "Serve BM25 search over a built index")]
struct Args {
    /// Directory written by `indexer build`
    #[arg(long, default_value = "./index")]
    index: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let engine = Engine::load(&args.index)
        .with_context(|| format!("loading index from {}", args.index.display()))?;
    let stats = engine.stats();
    let app = server::router(Arc::new(engine));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, index = %args.index.display(), documents = stats.doc_count, avg_doc_len = stats.avg_doc_len, "search server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
