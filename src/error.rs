//! Custom error types for docent

use thiserror::Error;

/// Main error type for docent operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Crawl error: {0}")]
    Crawl(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Index/embedder mismatch: {0}")]
    IndexMismatch(String),

    #[error("No documents survived crawling and extraction; nothing to index")]
    NoDocuments,

    #[error("Query error: {0}")]
    Query(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for docent
pub type Result<T> = std::result::Result<T, Error>;
