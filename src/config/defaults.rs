//! Default values for configuration

use std::path::PathBuf;

/// Default data directory (links file, raw pages, index)
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Default user agent
pub fn default_crawl_user_agent() -> String {
    format!("docent/{}", env!("CARGO_PKG_VERSION"))
}

/// Default request timeout in seconds
pub fn default_crawl_timeout() -> u64 {
    30
}

/// Default maximum characters per chunk
pub fn default_chunk_max_chars() -> usize {
    1200
}

/// Default overlap characters between chunks
pub fn default_chunk_overlap() -> usize {
    200
}

/// Default local embedding model (384 dimensions)
pub fn default_local_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

/// Default batch size for embedding
pub fn default_embedding_batch_size() -> usize {
    32
}

/// Default chat completions base URL (OpenAI-compatible)
pub fn default_chat_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Default chat model
pub fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default environment variable holding the chat API key
pub fn default_chat_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Default number of chunks retrieved per question
pub fn default_retrieval_k() -> usize {
    6
}

/// Default maximum snippet length in the assembled context
pub fn default_snippet_max_chars() -> usize {
    600
}

/// Default server bind host
pub fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

/// Default server port
pub fn default_server_port() -> u16 {
    8080
}
