//! Citation-aware context assembly from search hits
//!
//! Citation numbers follow first appearance among the retrieved chunks, not
//! similarity rank and not alphabetical order, so duplicate sources keep one
//! stable number.

use crate::index::ScoredChunk;

/// Assembled context for the answer prompt
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    /// Formatted context block, one `[n] url` + snippet entry per chunk
    pub context: String,

    /// Unique source URLs in citation order
    pub sources: Vec<String>,
}

/// Build the citation table and context block from search hits.
pub fn assemble(hits: &[ScoredChunk], snippet_max_chars: usize) -> RetrievedContext {
    let mut sources: Vec<String> = Vec::new();
    for hit in hits {
        if !sources.contains(&hit.source_url) {
            sources.push(hit.source_url.clone());
        }
    }

    let citation = |url: &str| sources.iter().position(|s| s == url).unwrap_or(0) + 1;

    let lines: Vec<String> = hits
        .iter()
        .map(|hit| {
            format!(
                "[{}] {}\n{}\n",
                citation(&hit.source_url),
                hit.source_url,
                snippet(&hit.text, snippet_max_chars)
            )
        })
        .collect();

    RetrievedContext {
        context: lines.join("\n"),
        sources,
    }
}

/// Truncate chunk text to a snippet: at most `max_chars` characters, internal
/// newlines collapsed to spaces.
fn snippet(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
