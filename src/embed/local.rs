//! FastEmbed implementation for local embeddings
//!
//! This is the fallback provider: always available, no network, fixed small
//! models. The default matches the canonical query-time model.

use super::Embedder;
use crate::error::{Error, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Resolve a model name to the fastembed enum and its dimension
fn resolve_model(name: &str) -> (EmbeddingModel, &'static str, usize) {
    match name {
        "sentence-transformers/all-MiniLM-L6-v2" => {
            (EmbeddingModel::AllMiniLML6V2, "all-MiniLM-L6-v2", 384)
        }
        "BAAI/bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, "bge-small-en-v1.5", 384),
        "BAAI/bge-base-en-v1.5" => (EmbeddingModel::BGEBaseENV15, "bge-base-en-v1.5", 768),
        _ => {
            debug!("Unknown local model '{}', using all-MiniLM-L6-v2", name);
            (EmbeddingModel::AllMiniLML6V2, "all-MiniLM-L6-v2", 384)
        }
    }
}

/// FastEmbed-based embedder
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    id: String,
    dimension: usize,
}

impl LocalEmbedder {
    /// Create a new local embedder; downloads the model on first use
    pub fn new(model_name: &str) -> Result<Self> {
        let (model_enum, short_name, dimension) = resolve_model(model_name);

        info!("Initializing local embeddings with model {}", short_name);
        let options = InitOptions::new(model_enum).with_show_download_progress(true);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| Error::Embedding(format!("Failed to initialize local model: {}", e)))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            id: format!("fastembed:{}", short_name),
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Embedding {} texts locally", texts.len());

        // FastEmbed is synchronous, so the work moves to a blocking task
        let model = self.model.clone();
        let embeddings = tokio::task::spawn_blocking(move || {
            let model = model.blocking_lock();
            model.embed(texts, None)
        })
        .await
        .map_err(|e| Error::Embedding(format!("Task join error: {}", e)))?
        .map_err(|e| Error::Embedding(format!("Embedding failed: {}", e)))?;

        Ok(embeddings)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
