//! Grounded answer composition
//!
//! The query engine ties the loaded index, the chat capability, and the
//! context assembler together behind the single `answer` entry point the
//! HTTP layer and CLI consume.

use crate::chat::{create_chat_model, ChatModel};
use crate::config::Config;
use crate::embed::embedder_for_id;
use crate::error::Result;
use crate::index::{read_manifest, VectorIndex};
use crate::retrieve::assemble;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// System instruction for the chat model
const SYSTEM_PROMPT: &str = "You are an assistant answering questions about the \
indexed pages. Use only the provided context snippets. Be brief and to the \
point. If the data is not sufficient, say honestly what is missing.";

/// Fixed response when retrieval comes back empty; the chat capability is
/// never invoked on empty grounding
const NO_CONTEXT_ANSWER: &str = "No matching excerpts were found among the indexed \
pages. Try rephrasing the question, or add links to the link list and re-run \
ingestion.";

/// A composed answer with the sources actually used
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Query-time engine: loaded index plus chat capability
pub struct QueryEngine {
    index: VectorIndex,
    chat: Arc<dyn ChatModel>,
    snippet_max_chars: usize,
}

impl QueryEngine {
    /// Open the persisted index and construct the matching providers.
    ///
    /// The embedder is derived from the index manifest, so queries always use
    /// the provider the index was built with.
    pub fn open(config: &Config) -> Result<Self> {
        let index_dir = config.index_dir();
        let manifest = read_manifest(&index_dir)?;
        let embedder = embedder_for_id(&manifest.embedder_id, &config.embedding)?;
        let index = VectorIndex::load(&index_dir, embedder)?;
        let chat = create_chat_model(&config.chat)?;

        Ok(Self {
            index,
            chat,
            snippet_max_chars: config.retrieval.snippet_max_chars,
        })
    }

    /// Assemble an engine from parts
    pub fn new(index: VectorIndex, chat: Arc<dyn ChatModel>, snippet_max_chars: usize) -> Self {
        Self {
            index,
            chat,
            snippet_max_chars,
        }
    }

    /// Answer a question from the `k` nearest chunks.
    ///
    /// The returned source list is the assembler's citation order; it is
    /// authoritative and independent of what the model cites in prose.
    pub async fn answer(&self, question: &str, k: usize) -> Result<Answer> {
        let hits = self.index.search(question, k).await?;

        if hits.is_empty() {
            debug!("Empty retrieval for question, skipping chat call");
            return Ok(Answer {
                answer: NO_CONTEXT_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let ctx = assemble(&hits, self.snippet_max_chars);
        let user = user_prompt(question, &ctx.context);
        let text = self.chat.chat(SYSTEM_PROMPT, &user).await?;

        Ok(Answer {
            answer: text,
            sources: ctx.sources,
        })
    }
}

fn user_prompt(question: &str, context: &str) -> String {
    format!(
        "Question: {question}\n\n\
         Context snippets:\n{context}\n\n\
         Compose the answer. Finish with a block:\n\
         Sources: [n] URL; list only the sources actually used.\n\
         When a claim rests on a single snippet, you may put its [n] directly \
         in the text.\n"
    )
}
