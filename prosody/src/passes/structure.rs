//! Headers and lists rewritten as spoken announcements.
//!
//! The rewrite is line based. List detection is purely adjacency based: a
//! run of bullet lines is numbered in order, blank lines inside the run are
//! allowed, and any other non-blank line ends it.

use crate::annotated::{Annotated, Pause};
use crate::tables::ordinal;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Plain lines shorter than this may be promoted to implicit headers.
const PLAIN_HEADER_MAX_CHARS: usize = 100;

static MARKDOWN_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").unwrap());
static MARKUP_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>").unwrap());
static INNER_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})[.)][ \t]+(\S.*)$").unwrap());
static THEMATIC_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*_][ \t]*){3,}$").unwrap());

/// Rewrites headers and list markers into speakable phrases.
#[derive(Debug)]
pub struct StructuralRewriter {
    bullet_item: Regex,
}

impl StructuralRewriter {
    pub fn new(bullet_glyphs: &[char]) -> Result<Self, regex::Error> {
        let class: String = bullet_glyphs
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        Ok(Self {
            bullet_item: Regex::new(&format!(r"^[{class}][ \t]+(\S.*)$"))?,
        })
    }

    /// Rewrite `text`, producing the first annotated form of the document.
    pub fn rewrite(&self, text: &str) -> Annotated {
        let text = lift_markup_headers(text);
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let mut out = Annotated::default();
        let mut bullet_count = 0;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                out.push_str("\n");
                continue;
            }
            let ends_paragraph = lines.get(i + 1).is_some_and(|next| next.is_empty());

            if let Some(caps) = MARKDOWN_HEADER.captures(line) {
                bullet_count = 0;
                push_header(&mut out, caps[1].len(), &caps[2]);
                continue;
            }

            if THEMATIC_BREAK.is_match(line) {
                bullet_count = 0;
                out.push_str("\n");
                out.push_pause(Pause::Long);
                out.push_str("\n");
                continue;
            }

            let rewritten = if let Some(caps) = self.bullet_item.captures(line) {
                bullet_count += 1;
                format!("{}, {}", ordinal(bullet_count), &caps[1])
            } else {
                bullet_count = 0;
                match NUMBERED_ITEM.captures(line) {
                    Some(caps) => {
                        let n: usize = caps[1].parse().unwrap_or_default();
                        format!("{}, {}", ordinal(n), &caps[2])
                    }
                    None => line.to_string(),
                }
            };

            // Short unpunctuated lines before a blank line read as headers.
            if ends_paragraph && is_implicit_header(&rewritten) {
                out.push_str(&rewritten);
                out.push_str(".\n");
            } else {
                out.push_str(&rewritten);
                out.push_str("\n");
            }
        }

        log::debug!(
            "structure: {} lines -> {} bytes, {} pause hints",
            lines.len(),
            out.text().len(),
            out.hints().len()
        );
        out
    }
}

/// Turn `<h1>`..`<h6>` elements into markdown header lines. `<h1>`/`<h2>`
/// become top-level announcements, the rest minor ones. Normalized input has
/// its headings lifted already; this covers markup passed in directly.
fn lift_markup_headers(text: &str) -> String {
    MARKUP_HEADER
        .replace_all(text, |caps: &Captures<'_>| {
            let hashes = if matches!(&caps[1], "1" | "2") { "#" } else { "###" };
            let title = INNER_TAG.replace_all(&caps[2], "");
            let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
            format!("\n{} {}\n", hashes, title)
        })
        .into_owned()
}

fn push_header(out: &mut Annotated, level: usize, raw_title: &str) {
    let title = header_title(raw_title);

    out.push_str("\n\n");
    match level {
        1 => {
            out.push_str("Next section.");
            out.push_pause(Pause::Medium);
            out.push_str(" ");
        }
        2 => {
            out.push_str("Next.");
            out.push_pause(Pause::Short);
            out.push_str(" ");
        }
        _ => out.push_pause(Pause::Short),
    }
    out.push_str(&title);
    out.push_str("\n\n");
}

/// Header text with closing hashes removed and a terminal stop.
fn header_title(raw: &str) -> String {
    let title = raw.trim().trim_end_matches('#').trim_end();
    let title = title.trim_end_matches([':', ';', ',']);
    if title.is_empty() || ends_with_terminal(title) {
        title.to_string()
    } else {
        format!("{}.", title)
    }
}

/// Heuristic: a short line without terminal punctuation that closes a
/// paragraph is a header. Short closing remarks are false positives.
fn is_implicit_header(line: &str) -> bool {
    line.chars().count() < PLAIN_HEADER_MAX_CHARS
        && line.chars().any(char::is_alphanumeric)
        && !ends_with_terminal(line)
        && !line.ends_with([',', ';', ':'])
}

fn ends_with_terminal(text: &str) -> bool {
    let stripped = text.trim_end_matches(['"', '\'', ')', ']']);
    stripped.ends_with(['.', '!', '?'])
}
