//! Ordered (matcher, replacement) tables applied by one rewrite engine.
//!
//! Every lexical and cleanup pass is a [`RuleSet`]: a list of
//! [`RewriteRule`]s run in table order over an [`Annotated`] value, so pause
//! hints stay anchored while the text underneath them changes.

use crate::annotated::{Annotated, Edit};
use regex::{Captures, Regex};
use std::fmt;
use std::ops::Range;

/// Computes the replacement for one match; `None` leaves the match untouched.
pub type ReplaceFn = Box<dyn Fn(&Captures<'_>) -> Option<String> + Send + Sync>;

/// What a rule writes in place of its match.
pub enum Replacement {
    /// Expansion template in `regex` syntax (`$1`, `${name}`).
    Template(String),
    /// Computed from the captures.
    Computed(ReplaceFn),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A named matcher with its replacement.
#[derive(Debug)]
pub struct RewriteRule {
    name: String,
    pattern: Regex,
    replacement: Replacement,
}

impl RewriteRule {
    /// Build a rule from a pattern and an expansion template.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        template: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            replacement: Replacement::Template(template.into()),
        })
    }

    /// Build a rule whose replacement is computed per match.
    pub fn computed<F>(name: impl Into<String>, pattern: &str, f: F) -> Result<Self, regex::Error>
    where
        F: Fn(&Captures<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            replacement: Replacement::Computed(Box::new(f)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collect edits for every match that does not touch a protected span.
    fn edits(&self, text: &str, protected: &[Range<usize>]) -> Vec<Edit> {
        let mut edits = Vec::new();

        for caps in self.pattern.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.is_empty() || overlaps(m.range(), protected) {
                continue;
            }

            let replacement = match &self.replacement {
                Replacement::Template(template) => {
                    let mut dst = String::new();
                    caps.expand(template, &mut dst);
                    dst
                }
                Replacement::Computed(f) => match f(&caps) {
                    Some(r) => r,
                    None => continue,
                },
            };

            if replacement != m.as_str() {
                edits.push(Edit {
                    start: m.start(),
                    end: m.end(),
                    replacement,
                });
            }
        }

        edits
    }

    /// Apply this rule alone.
    pub fn apply(&self, doc: &mut Annotated, protect: Option<&Regex>) -> usize {
        let protected = protect
            .map(|p| p.find_iter(doc.text()).map(|m| m.range()).collect::<Vec<_>>())
            .unwrap_or_default();
        let edits = self.edits(doc.text(), &protected);
        doc.apply_edits(&edits);
        edits.len()
    }
}

fn overlaps(range: Range<usize>, protected: &[Range<usize>]) -> bool {
    protected
        .iter()
        .any(|p| range.start < p.end && p.start < range.end)
}

/// An ordered table of rules, optionally fenced off from protected spans.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
    protect: Option<Regex>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches of `pattern` are never rewritten by this set.
    pub fn protecting(mut self, pattern: Regex) -> Self {
        self.protect = Some(pattern);
        self
    }

    pub fn push(&mut self, rule: RewriteRule) {
        self.rules.push(rule);
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = RewriteRule>) {
        self.rules.extend(rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(RewriteRule::name)
    }

    /// Run every rule in table order. Returns the number of rewrites made.
    pub fn apply(&self, doc: &mut Annotated) -> usize {
        let mut total = 0;
        for rule in &self.rules {
            let n = rule.apply(doc, self.protect.as_ref());
            if n > 0 {
                log::trace!("rule {} rewrote {} span(s)", rule.name(), n);
            }
            total += n;
        }
        total
    }

    /// Convenience for callers holding a plain string.
    pub fn apply_str(&self, text: &str) -> String {
        let mut doc = Annotated::new(text);
        self.apply(&mut doc);
        doc.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotated::Pause;

    #[test]
    fn test_template_rule() {
        let rule = RewriteRule::new("percent", r"(\d+)\s*%", "$1 percent").unwrap();
        let mut doc = Annotated::new("50% off");
        assert_eq!(rule.apply(&mut doc, None), 1);
        assert_eq!(doc.text(), "50 percent off");
    }

    #[test]
    fn test_computed_rule_can_decline() {
        let rule = RewriteRule::computed("short-only", r"\w+", |caps| {
            let word = &caps[0];
            (word.len() <= 3).then(|| word.to_uppercase())
        })
        .unwrap();
        let mut doc = Annotated::new("the longest day");
        rule.apply(&mut doc, None);
        assert_eq!(doc.text(), "THE longest DAY");
    }

    #[test]
    fn test_rules_run_in_table_order() {
        let mut set = RuleSet::new();
        set.push(RewriteRule::new("without", r"\bw/o\b", "without").unwrap());
        set.push(RewriteRule::new("with", r"\bw/", "with").unwrap());
        assert_eq!(set.apply_str("tea w/o sugar"), "tea without sugar");
        assert_eq!(set.len(), 2);
        assert_eq!(set.rule_names().collect::<Vec<_>>(), vec!["without", "with"]);
    }

    #[test]
    fn test_protected_spans_are_skipped() {
        let mut set = RuleSet::new().protecting(Regex::new(r"https?://\S+").unwrap());
        set.push(RewriteRule::new("amp", "&", " and ").unwrap());
        assert_eq!(
            set.apply_str("R&D at http://x.io/?a=1&b=2"),
            "R and D at http://x.io/?a=1&b=2"
        );
    }

    #[test]
    fn test_apply_moves_hints() {
        let mut set = RuleSet::new();
        set.push(RewriteRule::new("eg", r"(?i)\be\.g\.", "for example").unwrap());
        let mut doc = Annotated::new("Fruit, e.g. apples");
        doc.insert_pause(6, Pause::Short);
        doc.insert_pause(18, Pause::Short);
        set.apply(&mut doc);
        assert_eq!(doc.text(), "Fruit, for example apples");
        assert_eq!(doc.hints()[0].offset, 6);
        assert_eq!(doc.hints()[1].offset, doc.text().len());
    }
}
