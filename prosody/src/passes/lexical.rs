//! Abbreviations, symbols and numbers expanded into spoken words.

use crate::annotated::Annotated;
use crate::config::AbbreviationEntry;
use crate::rewrite::{RewriteRule, RuleSet};
use crate::tables::{ABBREVIATIONS, PROTECTED_SPANS, SYMBOLS, currency_unit, symbol_phrase};

/// Grouped numbers at or above this value are read with a magnitude word.
const MAGNITUDE_THRESHOLD: f64 = 10_000.0;

const MAGNITUDES: &[(f64, &str)] = &[
    (1e12, "trillion"),
    (1e9, "billion"),
    (1e6, "million"),
    (1e3, "thousand"),
];

/// Expands abbreviations, currency, percentages, ranges and symbols.
#[derive(Debug)]
pub struct LexicalExpander {
    rules: RuleSet,
}

impl LexicalExpander {
    pub fn new(extra_abbreviations: &[AbbreviationEntry]) -> Result<Self, regex::Error> {
        let mut rules = RuleSet::new().protecting(PROTECTED_SPANS.clone());

        for (pattern, expansion) in ABBREVIATIONS {
            rules.push(RewriteRule::new(
                format!("abbreviation {}", expansion.trim()),
                &format!("(?i){pattern}"),
                *expansion,
            )?);
        }
        for entry in extra_abbreviations {
            rules.push(literal_abbreviation(entry)?);
        }

        rules.push(RewriteRule::new("and/or", r"(?i)\band/or\b", "and or")?);
        rules.push(RewriteRule::computed(
            "grouped number",
            r"\b\d{1,3}(?:,\d{3})+(?:\.\d+)?\b",
            |caps| speak_grouped_number(&caps[0]),
        )?);
        rules.push(RewriteRule::computed(
            "currency",
            r"([$€£])[ \t]?(\d+(?:,\d{3})*(?:\.\d+)?)((?:[ \t]+(?:thousand|million|billion|trillion))?)",
            |caps| {
                let sign = caps[1].chars().next()?;
                let unit = currency_unit(sign)?;
                Some(format!("{}{} {}", &caps[2], &caps[3], unit))
            },
        )?);
        rules.push(RewriteRule::new(
            "percentage",
            r"(\d+(?:\.\d+)?)[ \t]*%",
            "$1 percent",
        )?);
        rules.push(RewriteRule::computed(
            "numeric range",
            r"\b\d+(?:[-–]\d+)+\b",
            |caps| {
                let parts: Vec<&str> = caps[0].split(['-', '–']).collect();
                match parts.as_slice() {
                    [from, to] => Some(format!("{} to {}", from, to)),
                    _ => None,
                }
            },
        )?);

        let class: String = SYMBOLS
            .iter()
            .map(|(c, _)| regex::escape(&c.to_string()))
            .collect();
        rules.push(RewriteRule::computed(
            "symbol",
            &format!("[{class}]"),
            |caps| {
                let c = caps[0].chars().next()?;
                symbol_phrase(c).map(str::to_string)
            },
        )?);

        rules.push(RewriteRule::new("inner spaces", r"[ \t]{2,}", " ")?);
        rules.push(RewriteRule::new("line edges", r"(?m)^[ \t]+|[ \t]+$", "")?);
        rules.push(RewriteRule::new(
            "space before punctuation",
            r"[ \t]+([,.;:!?]+)(\s|$)",
            "$1$2",
        )?);

        Ok(Self { rules })
    }

    pub fn expand(&self, doc: &mut Annotated) {
        let before = doc.text().len();
        let rewrites = self.rules.apply(doc);
        log::debug!(
            "lexical: {} rewrites, {} -> {} bytes",
            rewrites,
            before,
            doc.text().len()
        );
    }
}

fn literal_abbreviation(entry: &AbbreviationEntry) -> Result<RewriteRule, regex::Error> {
    let abbreviation = entry.abbreviation.trim();
    let escaped = regex::escape(abbreviation);
    // Word boundaries only where the abbreviation itself starts or ends with a word char.
    let lead = if abbreviation.starts_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
    let trail = if abbreviation.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
    RewriteRule::new(
        format!("abbreviation {}", abbreviation),
        &format!("(?i){lead}{escaped}{trail}"),
        entry.expansion.replace('$', "$$"),
    )
}

/// Read a thousands-grouped number with a magnitude word when it is large.
///
/// Smaller grouped numbers are left for the synthesizer.
fn speak_grouped_number(grouped: &str) -> Option<String> {
    let value: f64 = grouped.replace(',', "").parse().ok()?;
    if value < MAGNITUDE_THRESHOLD {
        return None;
    }

    let (mut i, _) = MAGNITUDES
        .iter()
        .enumerate()
        .find(|(_, (scale, _))| value >= *scale)
        .map(|(i, m)| (i, *m))?;
    let mut scaled = round_one_decimal(value / MAGNITUDES[i].0);
    // 999,960 rounds to 1000.0 thousand; promote it to 1 million.
    if scaled >= 1000.0 && i > 0 {
        i -= 1;
        scaled = round_one_decimal(value / MAGNITUDES[i].0);
    }

    Some(format!("{} {}", format_decimal(scaled), MAGNITUDES[i].1))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
