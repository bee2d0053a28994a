use once_cell::sync::Lazy;
use proptest::prelude::*;
use prosody::chunk::{ChunkPlan, split_into_sentences};
use prosody::{ProsodyConfig, ProsodyError, ProsodyFormatter};
use regex::Regex;

static FORMATTER: Lazy<ProsodyFormatter> =
    Lazy::new(|| ProsodyFormatter::new(ProsodyConfig::default()).unwrap());

static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").unwrap());

fn sentence() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[a-z]{1,8},?", 1..12),
        prop::sample::select(vec![".", "!", "?"]),
    )
        .prop_map(|(words, end)| {
            let body = words.join(" ");
            format!("{}{}", body.trim_end_matches(','), end)
        })
}

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(sentence(), 1..6).prop_map(|s| s.join(" "))
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(paragraph(), 1..6).prop_map(|p| p.join("\n\n"))
}

fn html_document() -> impl Strategy<Value = String> {
    prop::collection::vec(paragraph(), 1..4).prop_map(|p| {
        p.iter()
            .map(|para| format!("<p><b>{}</b></p>", para))
            .collect::<Vec<_>>()
            .join("<script>x()</script>")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_format_is_total(input in "\\PC{0,200}") {
        match FORMATTER.format(&input) {
            Ok(_) => prop_assert!(!input.trim().is_empty()),
            Err(ProsodyError::EmptyInput) => prop_assert!(input.trim().is_empty()),
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn test_chunk_indices_are_contiguous(doc in document(), target in 10usize..300) {
        let formatted = FORMATTER.format(&doc).unwrap();
        let plan = ChunkPlan::from_text(&formatted, target, false);
        for (i, chunk) in plan.iter().enumerate() {
            prop_assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_chunks_reassemble_to_formatted_text(doc in document(), target in 10usize..300, clauses in any::<bool>()) {
        let formatted = FORMATTER.format(&doc).unwrap();
        let plan = ChunkPlan::from_text(&formatted, target, clauses);
        let reassembled = plan.reassemble();
        let rebuilt: Vec<&str> = reassembled.split_whitespace().collect();
        let original: Vec<&str> = formatted.split_whitespace().collect();
        prop_assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_chunks_respect_budget(doc in document(), target in 10usize..300) {
        let formatted = FORMATTER.format(&doc).unwrap();
        let plan = ChunkPlan::from_text(&formatted, target, false);
        for chunk in &plan {
            prop_assert!(
                chunk.char_count() <= target || split_into_sentences(&chunk.text).len() == 1,
                "chunk of {} chars over budget {}: {:?}",
                chunk.char_count(),
                target,
                chunk.text
            );
        }
    }

    #[test]
    fn test_output_has_no_markup(doc in html_document()) {
        let formatted = FORMATTER.format(&doc).unwrap();
        prop_assert!(!MARKUP.is_match(&formatted), "markup left in {:?}", formatted);
        prop_assert!(!formatted.contains("x()"));
    }

    #[test]
    fn test_formatting_is_stable(doc in document()) {
        let once = FORMATTER.format(&doc).unwrap();
        let twice = FORMATTER.format(&once).unwrap();
        prop_assert_eq!(twice, once);
    }
}
