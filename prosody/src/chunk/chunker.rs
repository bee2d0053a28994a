//! Budgeted chunking of formatted text.

use super::sentences::{split_into_clauses, split_into_sentences};
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between paragraphs inside a chunk and between chunks
/// when the text is reassembled.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

static PARAGRAPH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Accumulates units into chunks without exceeding the budget.
struct Accumulator {
    target_chars: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Accumulator {
    fn new(target_chars: usize) -> Self {
        Self {
            target_chars,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// Whether `len` more characters fit after `separator`.
    fn fits(&self, separator: &str, len: usize) -> bool {
        if self.current.is_empty() {
            return len <= self.target_chars;
        }
        self.current_len + char_len(separator) + len <= self.target_chars
    }

    /// Append a unit known to fit within the budget on its own.
    fn push(&mut self, separator: &str, unit: &str) {
        let len = char_len(unit);
        if !self.fits(separator, len) {
            log::trace!("chunk {} closed at {} chars", self.chunks.len(), self.current_len);
            self.flush();
        }
        if !self.current.is_empty() {
            self.current.push_str(separator);
            self.current_len += char_len(separator);
        }
        self.current.push_str(unit);
        self.current_len += len;
    }

    /// Emit `unit` as a chunk of its own.
    fn push_alone(&mut self, unit: &str) {
        self.flush();
        self.chunks.push(unit.to_string());
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Split formatted text into chunks of at most `target_chars` characters.
///
/// Paragraphs are packed first. A paragraph over the budget is split into
/// sentences, which are packed the same way. A sentence over the budget is
/// emitted as its own oversized chunk, or, with `split_clauses`, split
/// after commas, semicolons and colons first.
pub fn chunk_text(text: &str, target_chars: usize, split_clauses: bool) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let target_chars = target_chars.max(1);
    let mut acc = Accumulator::new(target_chars);

    for paragraph in PARAGRAPH_SPLIT.split(text) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        if char_len(paragraph) <= target_chars {
            acc.push(PARAGRAPH_SEPARATOR, paragraph);
            continue;
        }

        log::trace!("paragraph of {} chars split into sentences", char_len(paragraph));
        acc.flush();
        for sentence in split_into_sentences(paragraph) {
            let len = char_len(&sentence);
            if len <= target_chars {
                acc.push(" ", &sentence);
            } else if split_clauses {
                acc.flush();
                for clause in split_into_clauses(&sentence) {
                    if char_len(&clause) <= target_chars {
                        acc.push(" ", &clause);
                    } else {
                        log::warn!(
                            "clause of {} chars exceeds chunk budget of {}",
                            char_len(&clause),
                            target_chars
                        );
                        acc.push_alone(&clause);
                    }
                }
                acc.flush();
            } else {
                log::warn!(
                    "sentence of {} chars exceeds chunk budget of {}",
                    len,
                    target_chars
                );
                acc.push_alone(&sentence);
            }
        }
    }

    let chunks = acc.finish();
    log::debug!(
        "chunker: {} chars -> {} chunks (budget {})",
        char_len(text),
        chunks.len(),
        target_chars
    );
    chunks
}
