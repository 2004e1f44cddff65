//! Text chunking with a recursive-separator strategy
//!
//! Documents are split into overlapping windows, preferring to cut at the
//! coarsest separator available: paragraph breaks, then line breaks, then
//! sentence boundaries, then spaces. Chunk text is taken from the document
//! unmodified, so consecutive chunks overlap exactly and the document can be
//! reconstructed from them.

use crate::config::ChunkConfig;
use crate::crawl::PageRecord;
use crate::error::{Error, Result};
use tracing::info;

/// Separators tried when picking a cut point, coarsest first
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

/// A bounded slice of one document's text, the unit of embedding and retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The chunk text, verbatim from the document
    pub text: String,

    /// URL of the owning document
    pub source_url: String,

    /// Position among the chunks of the same document (0-based)
    pub sequence: usize,
}

/// Split crawled records into chunks.
///
/// Records with absent text are filtered out first. An empty filtered list
/// aborts the run: there is nothing to index.
pub fn split_documents(records: &[PageRecord], config: &ChunkConfig) -> Result<Vec<Chunk>> {
    let docs: Vec<(&str, &str)> = records
        .iter()
        .filter_map(|r| r.text.as_deref().map(|t| (r.url.as_str(), t)))
        .collect();

    if docs.is_empty() {
        return Err(Error::NoDocuments);
    }

    let mut chunks = Vec::new();
    for &(url, text) in &docs {
        let pieces = split_text(text, config.max_chars, config.overlap_chars);
        for (sequence, piece) in pieces.into_iter().enumerate() {
            chunks.push(Chunk {
                text: piece,
                source_url: url.to_string(),
                sequence,
            });
        }
    }

    info!("Split {} documents into {} chunks", docs.len(), chunks.len());
    Ok(chunks)
}

/// Split one text into overlapping windows of at most `max_chars` characters.
///
/// Sizes count characters, not bytes; cuts always land on character
/// boundaries.
pub fn split_text(text: &str, max_chars: usize, overlap_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every character, plus the end of the text
    let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
    boundaries.push(text.len());
    let total = boundaries.len() - 1;

    if total <= max_chars {
        return vec![text.to_string()];
    }

    // Overlap must stay below the window size or windows would never advance
    let overlap = overlap_chars.min(max_chars.saturating_sub(1));

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let window_end = (start + max_chars).min(total);
        let cut = if window_end == total {
            total
        } else {
            find_cut(text, &boundaries, start, window_end, overlap)
        };

        chunks.push(text[boundaries[start]..boundaries[cut]].to_string());

        if cut == total {
            break;
        }
        start = cut - overlap;
    }

    chunks
}

/// Pick a cut point in `(start + overlap, window_end]`, preferring the last
/// occurrence of the coarsest separator; the cut falls just after the
/// separator. Falls back to a hard cut at the window end.
fn find_cut(
    text: &str,
    boundaries: &[usize],
    start: usize,
    window_end: usize,
    overlap: usize,
) -> usize {
    let window = &text[boundaries[start]..boundaries[window_end]];

    for sep in SEPARATORS {
        if let Some(pos) = window.rfind(sep) {
            let cut_byte = boundaries[start] + pos + sep.len();
            let Ok(cut) = boundaries.binary_search(&cut_byte) else {
                continue;
            };
            if cut > start + overlap {
                return cut;
            }
        }
    }

    window_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, text: Option<&str>) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            text: text.map(str::to_string),
        }
    }

    /// Reconstruct a document from its chunks by dropping each chunk's
    /// leading overlap.
    fn reconstruct(chunks: &[String], overlap: usize) -> String {
        let mut text: String = chunks.first().cloned().unwrap_or_default();
        for chunk in &chunks[1..] {
            text.extend(chunk.chars().skip(overlap));
        }
        text
    }

    #[test]
    fn test_exactly_max_chars_is_one_chunk() {
        let text = "x".repeat(1200);
        let chunks = split_text(&text, 1200, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_windows_advance_and_reconstruct() {
        let text: String = "abcdefghij".chars().cycle().take(2000).collect();
        let chunks = split_text(&text, 1200, 200);

        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1200);
        }

        // Without separators the cut is hard: starts advance by exactly
        // max - overlap
        assert_eq!(chunks[0].chars().count(), 1200);
        assert_eq!(reconstruct(&chunks, 200), text);
    }

    #[test]
    fn test_prose_reconstructs_with_separator_cuts() {
        let sentence = "The tide keeps its own ledger of arrivals and departures. ";
        let text: String = sentence.repeat(60); // ~3500 chars
        let chunks = split_text(&text, 1200, 200);

        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1200);
            // Sentence-aware cut: every non-final chunk ends just after ". "
            if chunk != chunks.last().unwrap() {
                assert!(chunk.ends_with(". "));
            }
        }
        assert_eq!(reconstruct(&chunks, 200), text);
    }

    #[test]
    fn test_paragraph_breaks_beat_sentence_breaks() {
        // A paragraph break sits late in the first window; the cut must land
        // there rather than at a later sentence boundary.
        let para1: String = "Sentence one of many. ".repeat(50); // 1100 chars
        let text = format!("{}\n\n{}", para1.trim_end(), "Second paragraph starts here. ".repeat(40));
        let chunks = split_text(&text, 1200, 200);

        assert!(chunks[0].ends_with("\n\n"));
    }

    #[test]
    fn test_multibyte_text_cuts_on_char_boundaries() {
        let text: String = "данные и ответы ".chars().cycle().take(3000).collect();
        let chunks = split_text(&text, 1200, 200);

        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1200);
        }
        assert_eq!(reconstruct(&chunks, 200), text);
    }

    #[test]
    fn test_chunks_never_cross_documents() {
        let records = vec![
            record("https://a.example/1", Some(&"first ".repeat(400))),
            record("https://a.example/2", Some(&"second ".repeat(400))),
        ];
        let chunks = split_documents(&records, &ChunkConfig::default()).unwrap();

        for chunk in &chunks {
            if chunk.source_url.ends_with("/1") {
                assert!(!chunk.text.contains("second"));
            } else {
                assert!(!chunk.text.contains("first"));
            }
        }

        // Sequences restart per document
        let first_of_second = chunks
            .iter()
            .find(|c| c.source_url.ends_with("/2"))
            .unwrap();
        assert_eq!(first_of_second.sequence, 0);
    }

    #[test]
    fn test_absent_records_are_filtered() {
        let records = vec![
            record("https://a.example/dead", None),
            record("https://a.example/live", Some("Some modest page text.")),
        ];
        let chunks = split_documents(&records, &ChunkConfig::default()).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source_url, "https://a.example/live");
    }

    #[test]
    fn test_all_absent_is_fatal() {
        let records = vec![
            record("https://a.example/one", None),
            record("https://a.example/two", None),
        ];
        let result = split_documents(&records, &ChunkConfig::default());
        assert!(matches!(result, Err(Error::NoDocuments)));
    }
}
