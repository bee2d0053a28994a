//! Input normalization: markup to flat text, then whitespace cleanup.

use crate::tables::is_markup_element;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Characters that trip up synthesizers and their replacements.
const PROBLEMATIC_CHARS: &[(char, &str)] = &[
    ('\u{2018}', "'"),  // Left single quote
    ('\u{2019}', "'"),  // Right single quote
    ('\u{201a}', "'"),  // Low single quote
    ('\u{201c}', "\""), // Left double quote
    ('\u{201d}', "\""), // Right double quote
    ('\u{201e}', "\""), // Low double quote
    ('\u{00ab}', "\""), // Left-pointing double angle quote
    ('\u{00bb}', "\""), // Right-pointing double angle quote
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00a0}', " "),  // Non-breaking space
    ('\u{2009}', " "),  // Thin space
    ('\u{202f}', " "),  // Narrow no-break space
    ('\u{200b}', ""),   // Zero-width space
    ('\u{200c}', ""),   // Zero-width non-joiner
    ('\u{200d}', ""),   // Zero-width joiner
    ('\u{2060}', ""),   // Word joiner
    ('\u{feff}', ""),   // BOM
    ('\u{00ad}', ""),   // Soft hyphen
    ('\u{2011}', "-"),  // Non-breaking hyphen
    ('\u{2012}', "-"),  // Figure dash
    ('\u{2015}', "\u{2014}"), // Horizontal bar
];

/// Elements that start a new line when opened.
const BREAK_ON_OPEN: &[&str] = &["p", "br", "li", "div", "blockquote"];

/// Elements that also start a new line when closed.
const BREAK_ON_CLOSE: &[&str] = &["p", "div"];

/// Elements whose content is never read aloud.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<!--|<!doctype\b|</?([a-z][a-z0-9]*)(?:\s[^<>]*)?/?>").unwrap()
});
static DOUBLE_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+--[ \t]+").unwrap());

/// Normalize a raw document into flat text with paragraph breaks.
///
/// Markup, when present, is reduced to text first. Every input then gets
/// its problematic characters replaced and its whitespace normalized.
pub fn normalize_document(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = if looks_like_markup(&text) {
        html_to_text(&text)
    } else {
        text
    };
    let text = replace_problematic_chars(&text);
    let text = DOUBLE_HYPHEN.replace_all(&text, " \u{2014} ");
    normalize_whitespace(&text)
}

/// Whether the text contains a comment, a doctype or a tag naming a known
/// element. `x<y and y>z` is plain text.
pub fn looks_like_markup(text: &str) -> bool {
    MARKUP_TAG
        .captures_iter(text)
        .any(|caps| caps.get(1).is_none_or(|name| is_markup_element(name.as_str())))
}

/// Reduce markup to text, breaking lines at block elements.
///
/// Headings come out as markdown header lines (`#` for `<h1>`/`<h2>`, `###`
/// below that) so the structural pass announces them. The parser recovers
/// from malformed markup, so this never fails.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len());
    collect_text(document.root_element(), &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn push_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }

    if let Some(marker) = heading_marker(name) {
        let mut title = String::new();
        collect_text(element, &mut title);
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        out.push('\n');
        if !title.is_empty() {
            out.push_str(marker);
            out.push(' ');
            out.push_str(&title);
        }
        out.push('\n');
        return;
    }

    if BREAK_ON_OPEN.contains(&name) {
        out.push('\n');
    }
    collect_text(element, out);
    if BREAK_ON_CLOSE.contains(&name) {
        out.push('\n');
    }
}

fn heading_marker(name: &str) -> Option<&'static str> {
    match name {
        "h1" | "h2" => Some("#"),
        "h3" | "h4" | "h5" | "h6" => Some("###"),
        _ => None,
    }
}

/// Replace problematic characters and drop control characters.
fn replace_problematic_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        let replacement = PROBLEMATIC_CHARS
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, r)| *r);

        if let Some(r) = replacement {
            result.push_str(r);
        } else if c == '\n' || c == '\t' || !c.is_control() {
            result.push(c);
        }
    }

    result
}

/// Collapse horizontal whitespace, trim lines, and keep at most one blank
/// line between paragraphs.
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.split('\n') {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            blank_run += 1;
            continue;
        }

        if !result.is_empty() {
            result.push('\n');
            if blank_run > 0 {
                result.push('\n');
            }
        }
        blank_run = 0;
        result.push_str(&collapsed);
    }

    result
}
