//! Configuration management for docent
//!
//! Handles loading and validating configuration from TOML files. API keys are
//! never stored in the file; config names the environment variables that hold
//! them.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory holding `links.txt`, `raw/`, and `index/`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Web crawling configuration
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chat provider configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            crawl: CrawlConfig::default(),
            chunk: ChunkConfig::default(),
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
            retrieval: RetrievalConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Web crawling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Request timeout in seconds
    #[serde(default = "default_crawl_timeout")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_crawl_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_crawl_timeout(),
            user_agent: default_crawl_user_agent(),
        }
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_max_chars")]
    pub max_chars: usize,

    /// Overlap characters between consecutive chunks of one document
    #[serde(default = "default_chunk_overlap")]
    pub overlap_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: default_chunk_max_chars(),
            overlap_chars: default_chunk_overlap(),
        }
    }
}

/// Embedding provider configuration
///
/// When `remote` is absent the local model is the configured provider, not a
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Remote provider; probed once per run, falls back to local on failure
    #[serde(default)]
    pub remote: Option<RemoteEmbeddingConfig>,

    /// Local embedding model name
    #[serde(default = "default_local_embedding_model")]
    pub local_model: String,

    /// Batch size for embedding calls
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            remote: None,
            local_model: default_local_embedding_model(),
            batch_size: default_embedding_batch_size(),
        }
    }
}

/// Remote embedding provider (OpenAI-compatible `/embeddings` endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEmbeddingConfig {
    /// API base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Embedding model identifier
    pub model: String,

    /// Vector dimension the model produces
    pub dimension: usize,

    /// Environment variable holding the bearer token
    pub api_key_env: String,
}

/// Chat provider configuration (OpenAI-compatible `/chat/completions`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// API base URL
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,

    /// Chat model identifier
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_chat_api_key_env")]
    pub api_key_env: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_base_url(),
            model: default_chat_model(),
            api_key_env: default_chat_api_key_env(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question when the request does not say
    #[serde(default = "default_retrieval_k")]
    pub k: usize,

    /// Maximum snippet length in the assembled context
    #[serde(default = "default_snippet_max_chars")]
    pub snippet_max_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: default_retrieval_k(),
            snippet_max_chars: default_snippet_max_chars(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `docent.toml` in the working
    /// directory is tried, then `~/.config/docent/config.toml`, then built-in
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let local = PathBuf::from("docent.toml");
        if local.exists() {
            return Self::from_file(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("docent").join("config.toml");
            if user.exists() {
                return Self::from_file(&user);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path of the link list file
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join("links.txt")
    }

    /// Directory where raw fetched pages are persisted
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    /// Directory where the vector index is persisted
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Create the data directories if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.raw_dir())?;
        std::fs::create_dir_all(self.index_dir())?;
        Ok(())
    }
}

/// Read an API key from the environment variable a config section names
pub fn api_key_from_env(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| {
        Error::Config(format!("Environment variable {} is not set", var))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chunk.max_chars, 1200);
        assert_eq!(config.chunk.overlap_chars, 200);
        assert_eq!(config.retrieval.k, 6);
        assert_eq!(config.retrieval.snippet_max_chars, 600);
        assert!(config.embedding.remote.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("data_dir = \"/tmp/docent\"").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/docent"));
        assert_eq!(config.links_path(), PathBuf::from("/tmp/docent/links.txt"));
        assert_eq!(config.crawl.timeout_secs, 30);
    }

    #[test]
    fn test_parse_remote_embedding() {
        let toml_str = r#"
            [embedding.remote]
            base_url = "https://embeddings.example.com/v1"
            model = "text-embedding-3-small"
            dimension = 1536
            api_key_env = "EMBED_API_KEY"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let remote = config.embedding.remote.expect("remote section");
        assert_eq!(remote.dimension, 1536);
        assert_eq!(remote.api_key_env, "EMBED_API_KEY");
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/docent.toml")));
        assert!(result.is_err());
    }
}
