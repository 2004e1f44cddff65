//! docent — question answering over a fixed set of crawled web pages.
//!
//! The pipeline has two halves:
//! - Ingestion: fetch the configured links concurrently, extract plain text,
//!   split it into overlapping chunks, embed them, and persist a vector index.
//! - Query: embed the question, retrieve the nearest chunks, assemble a
//!   citation-aware context, and compose a grounded answer with the sources
//!   actually used.

pub mod answer;
pub mod chat;
pub mod chunk;
pub mod commands;
pub mod config;
pub mod crawl;
pub mod embed;
pub mod error;
pub mod extract;
pub mod index;
pub mod retrieve;
pub mod server;

pub use answer::{Answer, QueryEngine};
pub use chunk::Chunk;
pub use crawl::PageRecord;
pub use error::{Error, Result};
pub use index::VectorIndex;
