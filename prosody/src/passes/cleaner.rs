//! Final cleanup: strip what a synthesizer should not read, then resolve
//! pause hints into the output text.

use super::normalize::normalize_whitespace;
use crate::annotated::Annotated;
use crate::rewrite::{RewriteRule, RuleSet};
use crate::tables::{EMAIL, FENCED_CODE, INLINE_CODE, URL, is_markup_element};

/// Removes residual markup and resolves pauses.
#[derive(Debug)]
pub struct SpeechCleaner {
    rules: RuleSet,
    use_pause_markup: bool,
}

impl SpeechCleaner {
    pub fn new(max_parenthetical_length: usize, use_pause_markup: bool) -> Result<Self, regex::Error> {
        let mut rules = RuleSet::new();

        // Code and links go first so their contents never reach the later rules.
        rules.push(RewriteRule::new("fenced code", FENCED_CODE, " code block ")?);
        rules.push(RewriteRule::new("inline code", INLINE_CODE, "code")?);
        rules.push(RewriteRule::new(
            "markdown link",
            r"\[([^\[\]\n]*)\]\([^()\s]*\)",
            "$1",
        )?);
        rules.push(RewriteRule::new("url", URL, "link")?);
        rules.push(RewriteRule::new("email", EMAIL, "email address")?);
        rules.push(RewriteRule::computed(
            "markup",
            r"(?s)<!--.*?-->|</?([A-Za-z][A-Za-z0-9]*)(?:\s[^<>]*)?/?>",
            |caps| {
                caps.get(1)
                    .is_none_or(|name| is_markup_element(name.as_str()))
                    .then(String::new)
            },
        )?);

        // Emphasis delimiters must hug their content, so `2 * 3 * 4` is left alone.
        rules.push(RewriteRule::new("bold", r"\*\*(\S(?:[^*\n]*\S)?)\*\*", "$1")?);
        rules.push(RewriteRule::new("bold underscore", r"__([^_\n]+)__", "$1")?);
        rules.push(RewriteRule::new("italic", r"\*([^*\s](?:[^*\n]*[^*\s])?)\*", "$1")?);
        rules.push(RewriteRule::new("italic underscore", r"\b_([^_\n]+)_\b", "$1")?);
        rules.push(RewriteRule::new("stray emphasis", r"\*{2,}|\b_{2,}\b", "")?);
        rules.push(RewriteRule::new("heading marker", r"(?m)^[ \t]*#{1,6}[ \t]+", "")?);

        rules.push(RewriteRule::new("bracketed", r"\[[^\[\]\n]*\]", "")?);
        rules.push(RewriteRule::computed(
            "long parenthetical",
            r"\(([^()]*)\)",
            move |caps| (caps[1].chars().count() > max_parenthetical_length).then(String::new),
        )?);

        rules.push(RewriteRule::new("repeated marks", r"([!?])[!?]+", "$1")?);
        rules.push(RewriteRule::new("long ellipsis", r"\.{4,}", "...")?);

        rules.push(RewriteRule::new("empty parentheses", r"\([ \t]*\)", "")?);
        rules.push(RewriteRule::new("inner spaces", r"[ \t]{2,}", " ")?);
        rules.push(RewriteRule::new(
            "space before punctuation",
            r"[ \t]+([,.;:!?]+)(\s|$)",
            "$1$2",
        )?);
        rules.push(RewriteRule::new("line edges", r"(?m)^[ \t]+|[ \t]+$", "")?);

        Ok(Self {
            rules,
            use_pause_markup,
        })
    }

    /// Clean the document and render it as final text.
    pub fn clean(&self, mut doc: Annotated) -> String {
        let before = doc.text().len();
        let rewrites = self.rules.apply(&mut doc);
        let resolved = doc.resolve(self.use_pause_markup);
        let out = normalize_whitespace(&resolved);

        log::debug!(
            "cleaner: {} rewrites, {} pause hints resolved, {} -> {} bytes",
            rewrites,
            doc.hints().len(),
            before,
            out.len()
        );
        out
    }
}
