//! Text with out-of-band pause hints.
//!
//! Passes that run after the structural rewrite operate on [`Annotated`]
//! values: the evolving string plus a sorted list of pause hints anchored at
//! byte offsets. Hints never live inside the string, so nothing a later pass
//! substitutes can corrupt them, and no user text can be mistaken for one.

use serde::{Deserialize, Serialize};

/// How much separation the synthesizer should render at a point in the text.
///
/// Variants are ordered by strength; coinciding hints resolve to the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pause {
    Short,
    Medium,
    Long,
    Paragraph,
}

impl Pause {
    /// Break duration used when the target synthesizer accepts pause markup.
    pub fn break_millis(self) -> u32 {
        match self {
            Pause::Short => 250,
            Pause::Medium => 500,
            Pause::Long => 800,
            Pause::Paragraph => 1200,
        }
    }
}

/// A pause anchored at a byte offset of the annotated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseHint {
    pub offset: usize,
    pub pause: Pause,
}

/// A single replacement of `text[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Where a replaced span landed in the rewritten text.
#[derive(Debug, Clone, Copy)]
struct Moved {
    old_start: usize,
    old_end: usize,
    new_end: usize,
}

/// Text plus pause hints, kept sorted by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotated {
    text: String,
    hints: Vec<PauseHint>,
}

impl Annotated {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hints: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hints(&self) -> &[PauseHint] {
        &self.hints
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Anchor a pause at the current end of the text.
    pub fn push_pause(&mut self, pause: Pause) {
        self.hints.push(PauseHint {
            offset: self.text.len(),
            pause,
        });
    }

    /// Anchor a pause at `offset`. Offsets past the end or off a char
    /// boundary are ignored.
    pub fn insert_pause(&mut self, offset: usize, pause: Pause) {
        if offset > self.text.len() || !self.text.is_char_boundary(offset) {
            return;
        }
        let at = self.hints.partition_point(|h| h.offset <= offset);
        self.hints.insert(at, PauseHint { offset, pause });
    }

    /// Apply non-overlapping edits sorted by `start`, re-anchoring every hint.
    ///
    /// Hints at or before an edited span keep their place, hints after it
    /// shift by the length delta, and hints strictly inside it collapse to
    /// the end of the replacement.
    pub(crate) fn apply_edits(&mut self, edits: &[Edit]) {
        if edits.is_empty() {
            return;
        }

        let mut out = String::with_capacity(self.text.len());
        let mut moved = Vec::with_capacity(edits.len());
        let mut last = 0;

        for edit in edits {
            out.push_str(&self.text[last..edit.start]);
            out.push_str(&edit.replacement);
            moved.push(Moved {
                old_start: edit.start,
                old_end: edit.end,
                new_end: out.len(),
            });
            last = edit.end;
        }
        out.push_str(&self.text[last..]);

        for hint in &mut self.hints {
            hint.offset = remap(hint.offset, &moved);
        }
        self.text = out;
    }

    /// Render the final text.
    ///
    /// With `use_markup` off, short, medium and long pauses vanish (the
    /// punctuation around them carries the pause) and paragraph pauses force
    /// exactly one blank line. With it on, every pause becomes a `<break>`
    /// instruction and paragraph pauses still end the paragraph.
    pub fn resolve(&self, use_markup: bool) -> String {
        let mut out = String::with_capacity(self.text.len() + self.hints.len() * 8);
        let mut last = 0;
        let mut i = 0;

        while i < self.hints.len() {
            let offset = self.hints[i].offset;
            let mut pause = self.hints[i].pause;
            i += 1;
            while i < self.hints.len() && self.hints[i].offset == offset {
                pause = pause.max(self.hints[i].pause);
                i += 1;
            }

            // A previous paragraph break may already have skipped past this offset.
            if offset < last {
                continue;
            }
            out.push_str(&self.text[last..offset]);
            last = offset;

            if pause == Pause::Paragraph {
                let kept = out.trim_end().len();
                out.truncate(kept);
                let rest = &self.text[last..];
                last += rest.len() - rest.trim_start().len();
                if out.is_empty() {
                    continue;
                }
                if use_markup {
                    push_break(&mut out, pause);
                }
                out.push_str("\n\n");
            } else if use_markup {
                push_break(&mut out, pause);
            }
        }

        out.push_str(&self.text[last..]);
        out
    }
}

fn push_break(out: &mut String, pause: Pause) {
    out.push_str(&format!("<break time=\"{}ms\"/>", pause.break_millis()));
}

fn remap(offset: usize, moved: &[Moved]) -> usize {
    let before = moved.partition_point(|m| m.old_start < offset);
    if before == 0 {
        return offset;
    }
    let m = moved[before - 1];
    if offset < m.old_end {
        m.new_end
    } else {
        offset - m.old_end + m.new_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(start: usize, end: usize, replacement: &str) -> Edit {
        Edit {
            start,
            end,
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn test_pause_ordering() {
        assert!(Pause::Short < Pause::Medium);
        assert!(Pause::Medium < Pause::Long);
        assert!(Pause::Long < Pause::Paragraph);
    }

    #[test]
    fn test_insert_pause_keeps_hints_sorted() {
        let mut doc = Annotated::new("one, two, three");
        doc.insert_pause(9, Pause::Short);
        doc.insert_pause(4, Pause::Short);
        doc.insert_pause(4, Pause::Medium);
        let offsets: Vec<usize> = doc.hints().iter().map(|h| h.offset).collect();
        assert_eq!(offsets, vec![4, 4, 9]);
    }

    #[test]
    fn test_insert_pause_rejects_bad_offsets() {
        let mut doc = Annotated::new("né");
        doc.insert_pause(2, Pause::Short); // inside the two-byte 'é'
        doc.insert_pause(99, Pause::Short);
        assert!(doc.hints().is_empty());
    }

    #[test]
    fn test_edits_shift_following_hints() {
        let mut doc = Annotated::new("see e.g. this, ok");
        doc.insert_pause(14, Pause::Short); // after the comma
        doc.apply_edits(&[edit(4, 8, "for example")]);
        assert_eq!(doc.text(), "see for example this, ok");
        assert_eq!(&doc.text()[..doc.hints()[0].offset], "see for example this,");
    }

    #[test]
    fn test_edits_keep_leading_hints() {
        let mut doc = Annotated::new("stop. go & run");
        doc.insert_pause(5, Pause::Short);
        doc.apply_edits(&[edit(9, 10, "and")]);
        assert_eq!(doc.hints()[0].offset, 5);
    }

    #[test]
    fn test_hint_inside_removed_span_collapses() {
        let mut doc = Annotated::new("a (b, c) d");
        doc.insert_pause(5, Pause::Short);
        doc.apply_edits(&[edit(2, 8, "")]);
        assert_eq!(doc.text(), "a  d");
        assert_eq!(doc.hints()[0].offset, 2);
    }

    #[test]
    fn test_resolve_plain_drops_inline_pauses() {
        let mut doc = Annotated::new("First, second. Third");
        doc.insert_pause(6, Pause::Short);
        doc.insert_pause(14, Pause::Medium);
        assert_eq!(doc.resolve(false), "First, second. Third");
    }

    #[test]
    fn test_resolve_paragraph_forces_blank_line() {
        let mut doc = Annotated::new("One.\nTwo.");
        doc.insert_pause(4, Pause::Paragraph);
        assert_eq!(doc.resolve(false), "One.\n\nTwo.");
    }

    #[test]
    fn test_resolve_markup_uses_strongest_hint() {
        let mut doc = Annotated::new("Wait. Then");
        doc.insert_pause(5, Pause::Short);
        doc.insert_pause(5, Pause::Medium);
        assert_eq!(doc.resolve(true), "Wait.<break time=\"500ms\"/> Then");
    }

    #[test]
    fn test_resolve_leading_paragraph_is_dropped() {
        let mut doc = Annotated::new("\n\nBody");
        doc.insert_pause(0, Pause::Paragraph);
        assert_eq!(doc.resolve(true), "Body");
    }
}
