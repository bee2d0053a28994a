//! Pause hints at punctuation, transition and paragraph boundaries.
//!
//! This pass only adds hints; the text itself is left as it is. It runs
//! after lexical expansion so that the periods of expanded abbreviations
//! are no longer there to be mistaken for sentence ends.

use crate::annotated::{Annotated, Pause};
use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());
static ELLIPSIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.").unwrap());
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([.!?]+["')\]]*)(?:\s|\z)"#).unwrap());
static CLAUSE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:]\s").unwrap());
static DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[—–]|\s--?\s").unwrap());
static OPEN_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(").unwrap());
static CLOSE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)").unwrap());

/// Anchors pause hints in an annotated document.
#[derive(Debug)]
pub struct PauseInjector {
    transition: Option<Regex>,
}

impl PauseInjector {
    /// Build an injector for the given transition words. An empty list
    /// disables transition pauses.
    pub fn new(transition_words: &[String]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = transition_words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(|w| {
                let words: Vec<String> = w.split_whitespace().map(regex::escape).collect();
                words.join(r"\s+")
            })
            .collect();

        let transition = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r#"(?i)([.!?]["')\]]*)\s+(?:{})\b"#,
                alternatives.join("|")
            ))?)
        };

        Ok(Self { transition })
    }

    pub fn inject(&self, doc: &mut Annotated) {
        let before = doc.hints().len();
        let mut found: Vec<(usize, Pause)> = Vec::new();
        let text = doc.text();

        for m in PARAGRAPH_BREAK.find_iter(text) {
            found.push((m.start(), Pause::Paragraph));
        }
        if let Some(transition) = &self.transition {
            for caps in transition.captures_iter(text) {
                if let Some(punct) = caps.get(1) {
                    found.push((punct.end(), Pause::Medium));
                }
            }
        }
        for m in ELLIPSIS.find_iter(text) {
            found.push((m.end(), Pause::Medium));
        }
        for caps in SENTENCE_END.captures_iter(text) {
            if let Some(punct) = caps.get(1) {
                found.push((punct.end(), Pause::Short));
            }
        }
        for m in CLAUSE_END.find_iter(text) {
            found.push((m.start() + 1, Pause::Short));
        }
        for m in DASH.find_iter(text) {
            // Anchor after the dash itself, not after the space that follows it.
            let end = m.as_str().trim_end().len();
            found.push((m.start() + end, Pause::Short));
        }
        for m in OPEN_PAREN.find_iter(text) {
            found.push((m.start(), Pause::Short));
        }
        for m in CLOSE_PAREN.find_iter(text) {
            found.push((m.end(), Pause::Short));
        }

        for (offset, pause) in found {
            doc.insert_pause(offset, pause);
        }

        log::debug!(
            "pauses: {} hints added ({} total)",
            doc.hints().len() - before,
            doc.hints().len()
        );
    }
}
