//! Built-in rewrite tables.
//!
//! These are process-wide constants. Patterns are compiled once, on first
//! use, and never change afterwards; callers extend them through
//! [`ProsodyConfig`](crate::ProsodyConfig) instead of editing them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default bullet glyphs recognised at the start of a list line.
pub const DEFAULT_BULLET_GLYPHS: &[char] = &[
    '•', '◦', '▪', '▫', '■', '□', '●', '○', '‣', '⁃', '-', '*', '→', '➤', '►', '▶',
];

/// Spoken ordinals for list items; items past the table read as "Item N".
pub const ORDINALS: &[&str] = &[
    "First", "Second", "Third", "Fourth", "Fifth", "Sixth", "Seventh", "Eighth", "Ninth", "Tenth",
    "Eleventh", "Twelfth",
];

/// Words that get a medium pause when they open a sentence.
pub const TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "moreover",
    "nevertheless",
    "consequently",
    "meanwhile",
    "additionally",
    "alternatively",
    "subsequently",
    "for example",
    "for instance",
    "in addition",
    "in contrast",
    "in conclusion",
    "in summary",
    "on the other hand",
    "as a result",
    "instead",
    "otherwise",
    "similarly",
    "finally",
];

/// Abbreviations as (case-insensitive pattern, expansion), in match order.
///
/// Titles are case sensitive and expand only before a capitalised name on
/// the same line; acronyms expand in place. Longer forms come before their
/// prefixes (`w/o` before `w/`). A dotted abbreviation that ends a line keeps
/// its full stop, and so does `etc.` when a new sentence follows it.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    (r"(?-i)\bDr\.[ \t]+([A-Z])", "Doctor $1"),
    (r"(?-i)\bMrs\.[ \t]+([A-Z])", "Missus $1"),
    (r"(?-i)\bMr\.[ \t]+([A-Z])", "Mister $1"),
    (r"(?-i)\bMs\.[ \t]+([A-Z])", "Miz $1"),
    (r"(?-i)\bProf\.[ \t]+([A-Z])", "Professor $1"),
    (r"(?m)\be\.g\.[ \t]*$", "for example."),
    (r"\be\.g\.", "for example"),
    (r"(?m)\bi\.e\.[ \t]*$", "that is."),
    (r"\bi\.e\.", "that is"),
    (r"(?m)\betc\.[ \t]*$", "and so on."),
    (r"\betc\.([ \t]+)(?-i:([A-Z]))", "and so on.$1$2"),
    (r"\betc\.", "and so on"),
    (r"(?m)\bvs\.[ \t]*$", "versus."),
    (r"\bvs\b\.?", "versus"),
    (r"(?m)\bapprox\.[ \t]*$", "approximately."),
    (r"\bapprox\.", "approximately"),
    (r"(?m)\ba\.k\.a\.[ \t]*$", "also known as."),
    (r"\ba\.k\.a\.", "also known as"),
    (r"\baka\b", "also known as"),
    (r"\bw/o\b", "without"),
    (r"\bw/(\s)", "with$1"),
    (r"\bASAP\b", "as soon as possible"),
    (r"\bFYI\b", "for your information"),
    (r"\bIMHO\b", "in my humble opinion"),
    (r"\bIMO\b", "in my opinion"),
    (r"\bBTW\b", "by the way"),
    (r"\bTL;?DR\b", "in summary"),
    (r"\bFAQs?\b", "frequently asked questions"),
];

/// Single characters verbalised by direct substitution.
///
/// Keys are disjoint, so the order of application does not matter.
pub const SYMBOLS: &[(char, &str)] = &[
    ('&', " and "),
    ('%', " percent "),
    ('©', " copyright "),
    ('®', " registered "),
    ('™', " trademark "),
    ('§', " section "),
    ('+', " plus "),
    ('=', " equals "),
    ('±', " plus or minus "),
    ('×', " times "),
    ('÷', " divided by "),
    ('≈', " approximately "),
    ('≠', " not equal to "),
    ('≤', " less than or equal to "),
    ('≥', " greater than or equal to "),
    ('∞', " infinity "),
    ('°', " degrees "),
    ('→', " leads to "),
    ('←', " comes from "),
    ('⇒', " implies "),
    ('↔', " to and from "),
    ('↑', " up "),
    ('↓', " down "),
];

/// Element names that mark a document as markup, plus the SSML tags the
/// cleaner can emit. Anything else in angle brackets is plain text.
pub(crate) const MARKUP_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "b", "blockquote", "body", "br", "break",
    "button", "caption", "center", "cite", "code", "dd", "del", "details", "dfn", "div", "dl",
    "dt", "em", "figcaption", "figure", "font", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "li", "link", "main", "mark", "meta", "nav", "noscript", "ol", "p", "pre", "q", "s",
    "samp", "script", "section", "small", "span", "speak", "strong", "style", "sub",
    "summary", "sup", "svg", "table", "tbody", "td", "template", "tfoot", "th", "thead",
    "time", "title", "tr", "u", "ul", "var",
];

/// Whether `name` is a known markup element, ignoring case.
pub fn is_markup_element(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    MARKUP_ELEMENTS.contains(&name.as_str())
}

/// Currency signs and the unit spoken after the amount.
pub const CURRENCIES: &[(char, &str)] = &[('$', "dollars"), ('€', "euros"), ('£', "pounds")];

/// Look up a symbol's spoken form.
pub fn symbol_phrase(c: char) -> Option<&'static str> {
    SYMBOLS.iter().find(|(ch, _)| *ch == c).map(|(_, p)| *p)
}

/// Look up a currency unit.
pub fn currency_unit(c: char) -> Option<&'static str> {
    CURRENCIES.iter().find(|(ch, _)| *ch == c).map(|(_, u)| *u)
}

/// Spoken ordinal for a 1-based list position.
pub fn ordinal(n: usize) -> String {
    match n.checked_sub(1).and_then(|i| ORDINALS.get(i)) {
        Some(word) => (*word).to_string(),
        None => format!("Item {}", n),
    }
}

pub(crate) const FENCED_CODE: &str = r"(?s)```.*?```";
pub(crate) const INLINE_CODE: &str = r"`[^`\n]+`";
pub(crate) const URL: &str =
    r#"\b(?:https?://|www\.)[^\s<>"'()\[\]]*[^\s<>"'()\[\].,;:!?]"#;
pub(crate) const EMAIL: &str = r"\b[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[A-Za-z]{2,}\b";

/// Spans the lexical pass must leave alone: the cleaner rewrites them whole.
pub(crate) static PROTECTED_SPANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{FENCED_CODE}|{INLINE_CODE}|{URL}|{EMAIL}")).unwrap()
});
