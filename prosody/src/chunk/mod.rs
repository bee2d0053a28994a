//! Streaming chunks: ordered, budgeted slices of formatted text.

mod chunker;
mod sentences;

pub use chunker::{PARAGRAPH_SEPARATOR, chunk_text};
pub use sentences::{split_into_clauses, split_into_sentences};

use crate::error::{ProsodyError, Result};
use serde::{Deserialize, Serialize};

/// Narration speed used for duration estimates.
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// Length of the text preview in a chunk summary, in characters.
pub const PREVIEW_CHARS: usize = 100;

/// A chunk of formatted text, addressable by its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position in playback order
    pub index: usize,
    /// The text to synthesize
    pub text: String,
}

impl Chunk {
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// The ordered chunk list for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    chunks: Vec<Chunk>,
}

impl ChunkPlan {
    /// Chunk already formatted text.
    pub fn from_text(formatted: &str, target_chars: usize, split_clauses: bool) -> Self {
        chunk_text(formatted, target_chars, split_clauses)
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// Look up one chunk for by-index regeneration.
    pub fn get(&self, index: usize) -> Result<&Chunk> {
        self.chunks
            .get(index)
            .ok_or(ProsodyError::ChunkIndexOutOfRange {
                index,
                total: self.chunks.len(),
            })
    }

    /// Partition into the first `n` chunks and the rest. `n` past the end
    /// clamps to the length.
    pub fn split_at(&self, n: usize) -> (&[Chunk], &[Chunk]) {
        self.chunks.split_at(n.min(self.chunks.len()))
    }

    /// Join the chunks back together with paragraph breaks.
    pub fn reassemble(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR)
    }

    /// Chunk metadata for planning playback without generating audio.
    pub fn summary(&self) -> ChunkSummary {
        let chunks: Vec<ChunkInfo> = self.chunks.iter().map(ChunkInfo::from).collect();
        let total_chars = chunks.iter().map(|c| c.char_count).sum();
        let total_words: usize = chunks.iter().map(|c| c.word_count).sum();

        ChunkSummary {
            total_chunks: chunks.len(),
            total_chars,
            total_words,
            estimated_duration_secs: estimate_duration_secs(total_words),
            chunks,
        }
    }
}

impl FromIterator<String> for ChunkPlan {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            chunks: iter
                .into_iter()
                .enumerate()
                .map(|(index, text)| Chunk::new(index, text))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChunkPlan {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

/// Seconds needed to narrate `words` at [`WORDS_PER_MINUTE`].
pub fn estimate_duration_secs(words: usize) -> f64 {
    words as f64 / WORDS_PER_MINUTE * 60.0
}

/// Per-chunk metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkInfo {
    pub index: usize,
    pub char_count: usize,
    pub word_count: usize,
    pub preview: String,
}

impl From<&Chunk> for ChunkInfo {
    fn from(chunk: &Chunk) -> Self {
        Self {
            index: chunk.index,
            char_count: chunk.char_count(),
            word_count: chunk.word_count(),
            preview: preview(&chunk.text),
        }
    }
}

/// Metadata for a whole chunk plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkSummary {
    pub total_chunks: usize,
    pub total_chars: usize,
    pub total_words: usize,
    pub estimated_duration_secs: f64,
    pub chunks: Vec<ChunkInfo>,
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(texts: &[&str]) -> ChunkPlan {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_indices_are_contiguous() {
        let plan = ChunkPlan::from_text("One.\n\nTwo.\n\nThree.", 5, false);
        let indices: Vec<usize> = plan.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_get_by_index() {
        let plan = plan(&["a", "b"]);
        assert_eq!(plan.get(1).unwrap().text, "b");
        let err = plan.get(2).unwrap_err();
        assert!(matches!(
            err,
            ProsodyError::ChunkIndexOutOfRange { index: 2, total: 2 }
        ));
    }

    #[test]
    fn test_split_at_clamps() {
        let plan = plan(&["a", "b", "c"]);
        let (first, rest) = plan.split_at(1);
        assert_eq!(first.len(), 1);
        assert_eq!(rest[0].index, 1);

        let (first, rest) = plan.split_at(10);
        assert_eq!(first.len(), 3);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_reassemble() {
        let plan = plan(&["One.", "Two."]);
        assert_eq!(plan.reassemble(), "One.\n\nTwo.");
    }

    #[test]
    fn test_summary() {
        let plan = plan(&["one two three", "four five"]);
        let summary = plan.summary();
        assert_eq!(summary.total_chunks, 2);
        assert_eq!(summary.total_words, 5);
        assert_eq!(summary.total_chars, 22);
        assert_eq!(summary.chunks[1].word_count, 2);
        assert!((summary.estimated_duration_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_is_truncated() {
        let long = "é".repeat(150);
        let plan = plan(&[long.as_str(), "short"]);
        let summary = plan.summary();
        assert_eq!(summary.chunks[0].preview, format!("{}...", "é".repeat(100)));
        assert_eq!(summary.chunks[1].preview, "short");
    }

    #[test]
    fn test_empty_plan() {
        let plan = ChunkPlan::from_text("  ", 800, false);
        assert!(plan.is_empty());
        assert_eq!(plan.summary().total_chunks, 0);
        let (first, rest) = plan.split_at(3);
        assert!(first.is_empty() && rest.is_empty());
    }

    #[test]
    fn test_chunk_serializes() {
        let json = serde_json::to_string(&Chunk::new(0, "Hi.".into())).unwrap();
        assert_eq!(json, r#"{"index":0,"text":"Hi."}"#);
    }
}
