//! Sentence and clause splitting on formatted text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Terminal punctuation, optional closing quotes/brackets and rendered
/// breaks, then horizontal space. A newline always ends a sentence.
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([.!?]+["')\]]*(?:<break [^<>]*/>)*)[ \t]+|\n"#).unwrap()
});

static CLAUSE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([,;:](?:<break [^<>]*/>)*)[ \t]+").unwrap());

/// Split text into sentences, keeping their terminal punctuation.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    split_on(&SENTENCE_BOUNDARY, text)
}

/// Split a sentence after commas, semicolons and colons.
pub fn split_into_clauses(sentence: &str) -> Vec<String> {
    split_on(&CLAUSE_BOUNDARY, sentence)
}

fn split_on(boundary: &Regex, text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;

    for caps in boundary.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let end = caps.get(1).map_or(m.start(), |p| p.end());
        push_trimmed(&mut parts, &text[start..end]);
        start = m.end();
    }
    push_trimmed(&mut parts, &text[start..]);

    parts
}

fn push_trimmed(parts: &mut Vec<String>, part: &str) {
    let part = part.trim();
    if !part.is_empty() {
        parts.push(part.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_into_sentences() {
        let sentences = split_into_sentences("Hello. World! Is it? \"Yes.\" Done");
        assert_eq!(sentences, vec!["Hello.", "World!", "Is it?", "\"Yes.\"", "Done"]);
    }

    #[test]
    fn test_decimals_and_ellipsis() {
        let sentences = split_into_sentences("It grew 12.5 percent... Then fell.");
        assert_eq!(sentences, vec!["It grew 12.5 percent...", "Then fell."]);
    }

    #[test]
    fn test_newlines_end_sentences() {
        let sentences = split_into_sentences("First, A\nSecond, B");
        assert_eq!(sentences, vec!["First, A", "Second, B"]);
    }

    #[test]
    fn test_break_markup_stays_with_sentence() {
        let text = "One.<break time=\"250ms\"/> Two.";
        assert_eq!(
            split_into_sentences(text),
            vec!["One.<break time=\"250ms\"/>", "Two."]
        );
    }

    #[test]
    fn test_no_punctuation_is_one_sentence() {
        assert_eq!(split_into_sentences("no boundaries here"), vec!["no boundaries here"]);
        assert!(split_into_sentences("   ").is_empty());
    }

    #[test]
    fn test_split_into_clauses() {
        let clauses = split_into_clauses("One, two; three: four");
        assert_eq!(clauses, vec!["One,", "two;", "three:", "four"]);
    }
}
