//! Chat capability boundary
//!
//! The answer composer needs exactly one operation from a language model:
//! send a system instruction and a user message, get text back. Concrete
//! implementations are chosen by configuration.

mod remote;

pub use remote::*;

use crate::config::ChatConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for chat providers
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// One chat turn: system instruction plus user message, model text back
    async fn chat(&self, system: &str, user: &str) -> Result<String>;
}

/// Create a chat model based on configuration
pub fn create_chat_model(config: &ChatConfig) -> Result<Arc<dyn ChatModel>> {
    Ok(Arc::new(RemoteChatModel::new(config)?))
}
