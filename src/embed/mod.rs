//! Embedding generation
//!
//! This module provides an abstraction over embedding models with:
//! - A trait for different embedding backends
//! - A remote OpenAI-compatible backend and a local fastembed backend
//! - One-shot provider selection with a health probe and local fallback
//! - Batch processing for efficiency
//!
//! A vector index is only meaningful when queried with the embedder that
//! built it, so every embedder exposes a stable identity string that the
//! index manifest records.

#[cfg(feature = "local-embed")]
mod local;
mod remote;

#[cfg(feature = "local-embed")]
pub use local::*;
pub use remote::*;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Text used for the one-shot provider health probe
const HEALTHCHECK_TEXT: &str = "healthcheck";

/// Trait for embedding providers
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(vec![text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("Provider returned no vector".to_string()))
    }

    /// Stable provider identity, persisted in the index manifest
    fn id(&self) -> &str;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;
}

/// Outcome of provider selection, decided once per run and passed down
pub struct EmbedderSelection {
    pub embedder: Arc<dyn Embedder>,
    pub used_fallback: bool,
}

/// Select the embedding provider for this run.
///
/// When a remote provider is configured it is constructed and health-probed
/// with a single embedding call; any failure logs one warning and switches
/// permanently to the local provider. The choice is not revisited mid-run,
/// and a local provider failure is fatal.
pub async fn select_embedder(config: &EmbeddingConfig) -> Result<EmbedderSelection> {
    if let Some(remote_config) = &config.remote {
        match probe_remote(remote_config).await {
            Ok(embedder) => {
                info!("Using remote embedding provider {}", embedder.id());
                return Ok(EmbedderSelection {
                    embedder,
                    used_fallback: false,
                });
            }
            Err(e) => {
                warn!("Remote embedding provider unavailable, falling back to local: {}", e);
                let embedder = local_embedder(config)?;
                return Ok(EmbedderSelection {
                    embedder,
                    used_fallback: true,
                });
            }
        }
    }

    // No remote configured: local is the chosen provider, not a fallback
    Ok(EmbedderSelection {
        embedder: local_embedder(config)?,
        used_fallback: false,
    })
}

async fn probe_remote(config: &crate::config::RemoteEmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    let embedder = RemoteEmbedder::new(config)?;
    embedder.embed_one(HEALTHCHECK_TEXT).await?;
    Ok(Arc::new(embedder))
}

/// Construct the embedder matching a persisted provider identity.
///
/// The serving path derives its embedder from the index manifest through
/// this function, so it cannot query with a provider the index was not
/// built with.
pub fn embedder_for_id(id: &str, config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    #[cfg(feature = "local-embed")]
    {
        if id.starts_with("fastembed:") {
            let embedder = LocalEmbedder::new(&config.local_model)?;
            if embedder.id() == id {
                return Ok(Arc::new(embedder));
            }
            return Err(Error::IndexMismatch(format!(
                "Index was built with '{}' but the configured local model resolves to '{}'",
                id,
                embedder.id()
            )));
        }
    }

    if let Some(remote_config) = &config.remote {
        let embedder = RemoteEmbedder::new(remote_config)?;
        if embedder.id() == id {
            return Ok(Arc::new(embedder));
        }
    }

    Err(Error::IndexMismatch(format!(
        "No configured embedding provider matches '{}' from the index manifest",
        id
    )))
}

#[cfg(feature = "local-embed")]
fn local_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(LocalEmbedder::new(&config.local_model)?))
}

#[cfg(not(feature = "local-embed"))]
fn local_embedder(_config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    Err(Error::Embedding(
        "Local embeddings unavailable: built without the local-embed feature".to_string(),
    ))
}

/// Helper to embed in batches
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size.max(1)) {
        let embeddings = embedder.embed(batch.to_vec()).await?;
        all_embeddings.extend(embeddings);
    }

    Ok(all_embeddings)
}
