//! On-disk vector index for chunk retrieval
//!
//! The index owns every (chunk, vector) pair and is persisted as a directory:
//! - `index.json` — chunk text, source metadata, and vectors
//! - `manifest.json` — embedding provider identity, dimension, chunk count,
//!   build timestamp
//! - `sources.json` — sorted, deduplicated source URLs; written for
//!   operability, never read by the query path
//!
//! Vector distances are only meaningful against the embedder that built the
//! index, so `load` refuses an embedder whose identity or dimension differs
//! from the manifest.

use crate::chunk::Chunk;
use crate::embed::{embed_in_batches, Embedder};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const INDEX_FILE: &str = "index.json";
const MANIFEST_FILE: &str = "manifest.json";
const SOURCES_FILE: &str = "sources.json";

/// One indexed chunk with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub text: String,
    pub source_url: String,
    pub sequence: usize,
    pub vector: Vec<f32>,
}

/// Index manifest: provenance needed to query the index safely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub embedder_id: String,
    pub dimension: usize,
    pub chunk_count: usize,
    pub built_at: DateTime<Utc>,
}

/// A search hit: chunk data plus its distance to the query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub source_url: String,
    pub distance: f32,
}

/// In-memory vector index, read-only once built or loaded
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Build an index by embedding every chunk.
    ///
    /// Returns `None` for an empty chunk list: there is nothing to index and
    /// nothing is created.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn Embedder>,
        batch_size: usize,
    ) -> Result<Option<Self>> {
        if chunks.is_empty() {
            return Ok(None);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embed_in_batches(embedder.as_ref(), texts, batch_size).await?;

        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "Provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexEntry {
                text: chunk.text,
                source_url: chunk.source_url,
                sequence: chunk.sequence,
                vector,
            })
            .collect();

        Ok(Some(Self { entries, embedder }))
    }

    /// Serialize the index into a directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let manifest = IndexManifest {
            embedder_id: self.embedder.id().to_string(),
            dimension: self.embedder.dimension(),
            chunk_count: self.entries.len(),
            built_at: Utc::now(),
        };

        std::fs::write(dir.join(INDEX_FILE), serde_json::to_string(&self.entries)?)?;
        std::fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?,
        )?;
        std::fs::write(
            dir.join(SOURCES_FILE),
            serde_json::to_string_pretty(&self.sources())?,
        )?;

        info!(
            "Saved index with {} chunks from {} sources to {}",
            self.entries.len(),
            self.sources().len(),
            dir.display()
        );
        Ok(())
    }

    /// Load a persisted index for querying with the supplied embedder.
    ///
    /// The embedder must match the manifest; querying with anything else
    /// would make every distance meaningless.
    pub fn load(dir: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let manifest = read_manifest(dir)?;

        if manifest.embedder_id != embedder.id() {
            return Err(Error::IndexMismatch(format!(
                "Index was built with '{}' but '{}' was supplied",
                manifest.embedder_id,
                embedder.id()
            )));
        }
        if manifest.dimension != embedder.dimension() {
            return Err(Error::IndexMismatch(format!(
                "Index stores {}-dimensional vectors but the embedder produces {}",
                manifest.dimension,
                embedder.dimension()
            )));
        }

        let content = std::fs::read_to_string(dir.join(INDEX_FILE))
            .map_err(|e| Error::Index(format!("Failed to read {}: {}", INDEX_FILE, e)))?;
        let entries: Vec<IndexEntry> = serde_json::from_str(&content)?;

        debug!("Loaded index with {} chunks from {}", entries.len(), dir.display());
        Ok(Self { entries, embedder })
    }

    /// Nearest-neighbor search: the `k` chunks with smallest cosine distance
    /// to the query, ties broken by insertion order.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(Error::Query("k must be a positive integer".to_string()));
        }

        let query_vector = self.embedder.embed_one(query).await?;

        let distances: Vec<f32> = self
            .entries
            .iter()
            .map(|entry| cosine_distance(&query_vector, &entry.vector))
            .collect();

        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        // Stable sort keeps insertion order for equal distances
        order.sort_by(|&a, &b| {
            distances[a]
                .partial_cmp(&distances[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(order
            .into_iter()
            .take(k)
            .map(|i| ScoredChunk {
                text: self.entries[i].text.clone(),
                source_url: self.entries[i].source_url.clone(),
                distance: distances[i],
            })
            .collect())
    }

    /// Assemble an index directly from entries
    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<IndexEntry>, embedder: Arc<dyn Embedder>) -> Self {
        Self { entries, embedder }
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, deduplicated source URLs present in the index
    pub fn sources(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.source_url.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Read just the manifest of a persisted index
pub fn read_manifest(dir: &Path) -> Result<IndexManifest> {
    let content = std::fs::read_to_string(dir.join(MANIFEST_FILE)).map_err(|e| {
        Error::Index(format!(
            "No index manifest at {}: {}",
            dir.join(MANIFEST_FILE).display(),
            e
        ))
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
