//! Ingest command implementation
//!
//! Runs the whole ingestion pipeline: load links, crawl, chunk, select the
//! embedding provider, build the index, persist it.

use crate::chunk::split_documents;
use crate::config::Config;
use crate::crawl::{load_links, Crawler};
use crate::embed::select_embedder;
use crate::error::Result;
use crate::index::VectorIndex;
use serde::Serialize;
use tracing::{info, warn};

/// Statistics from an ingestion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub pages_crawled: usize,
    pub pages_with_text: usize,
    pub chunks_indexed: usize,
    pub sources_indexed: usize,
    pub used_fallback_embeddings: bool,
}

/// Crawl the configured links and build the vector index
pub async fn cmd_ingest(config: &Config) -> Result<IngestStats> {
    config.ensure_dirs()?;

    let links = load_links(&config.links_path())?;
    info!("Ingesting {} links from {}", links.len(), config.links_path().display());

    let crawler = Crawler::new(&config.crawl, &config.raw_dir())?;
    let records = crawler.crawl_all(&links).await;
    let pages_with_text = records.iter().filter(|r| r.text.is_some()).count();

    let chunks = split_documents(&records, &config.chunk)?;

    let selection = select_embedder(&config.embedding).await?;
    if selection.used_fallback {
        warn!("Index will be built with fallback embeddings");
    }

    let mut stats = IngestStats {
        pages_crawled: records.len(),
        pages_with_text,
        used_fallback_embeddings: selection.used_fallback,
        ..Default::default()
    };

    match VectorIndex::build(chunks, selection.embedder, config.embedding.batch_size).await? {
        Some(index) => {
            index.save(&config.index_dir())?;
            stats.chunks_indexed = index.len();
            stats.sources_indexed = index.sources().len();
        }
        None => info!("No chunks produced, nothing to index"),
    }

    Ok(stats)
}

/// Print a human-readable ingestion summary
pub fn print_ingest_stats(stats: &IngestStats, config: &Config) {
    println!(
        "Crawled {} pages ({} with text)",
        stats.pages_crawled, stats.pages_with_text
    );
    println!(
        "Indexed {} chunks from {} sources into {}",
        stats.chunks_indexed,
        stats.sources_indexed,
        config.index_dir().display()
    );
    if stats.used_fallback_embeddings {
        println!("Note: built with fallback embeddings (remote provider unavailable)");
    }
}
