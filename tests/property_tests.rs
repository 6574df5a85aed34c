//! Property-based tests for text splitting.
//!
//! These tests verify that both splitters maintain key invariants:
//! - Substrings: every recursive chunk is a verbatim slice of the input
//! - Ordered: chunks appear in source order
//! - Non-empty: no chunk is empty
//! - Bounded: chunks fit the budget when a character fallback exists
//! - Lossless: without overlap, no content is dropped or duplicated

use kerf::breakpoint::group_ranges;
use kerf::{
    split_recursive, split_semantic, split_sentences, CancellationToken, CharCount, FnGenerator,
    SemanticTextSplitterOptions, TextSplitterOptions,
};
use proptest::prelude::*;

// =============================================================================
// Test Generators
// =============================================================================

/// Arbitrary text, including multi-byte characters.
fn arbitrary_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("(?s).{0,400}").unwrap()
}

/// Words separated by runs of spaces, newlines and blank lines, sometimes
/// with a leading run.
fn structured_text() -> impl Strategy<Value = String> {
    let separator = || prop::sample::select(vec![" ", " ", " ", "\n", "\n\n", ". "]);
    (
        prop::collection::vec(separator(), 0..3),
        prop::collection::vec(
            (
                prop::string::string_regex("[A-Za-zé日]{1,25}").unwrap(),
                prop::collection::vec(separator(), 1..4),
            ),
            0..60,
        ),
    )
        .prop_map(|(leading, words)| {
            let mut text = leading.concat();
            for (word, run) in words {
                text.push_str(&word);
                text.push_str(&run.concat());
            }
            text
        })
}

/// Sentence-like text for the semantic splitter.
fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop::string::string_regex("[a-z]{1,8}( [a-z]{1,8}){0,6}").unwrap(),
            prop::sample::select(vec![".", "!", "?"]),
        ),
        0..15,
    )
    .prop_map(|sentences| {
        sentences
            .into_iter()
            .map(|(s, end)| s + end)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Check that each chunk occurs in `text` at or after the previous chunk's start.
fn chunks_ordered_substrings(chunks: &[String], text: &str) -> bool {
    let mut from = 0;
    for chunk in chunks {
        match text[from..].find(chunk.as_str()) {
            Some(offset) => from += offset,
            None => return false,
        }
    }
    true
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn split(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let options = TextSplitterOptions::default()
        .with_chunk_size(size)
        .with_chunk_overlap(overlap);
    split_recursive(text, &CharCount, &options).unwrap()
}

// =============================================================================
// Recursive Splitter
// =============================================================================

proptest! {
    #[test]
    fn recursive_chunks_are_ordered_substrings(
        text in arbitrary_text(),
        size in 1usize..120,
        overlap in 0usize..40,
    ) {
        let chunks = split(&text, size, overlap.min(size - 1));
        prop_assert!(chunks_ordered_substrings(&chunks, &text));
    }

    #[test]
    fn recursive_chunks_non_empty(text in structured_text(), size in 1usize..120) {
        let chunks = split(&text, size, 0);
        prop_assert!(chunks.iter().all(|c| !c.is_empty()));
        if text.chars().any(|c| !c.is_whitespace()) {
            prop_assert!(!chunks.is_empty());
        }
    }

    #[test]
    fn recursive_respects_size_with_char_fallback(
        text in structured_text(),
        size in 1usize..120,
        overlap in 0usize..40,
    ) {
        let chunks = split(&text, size, overlap.min(size - 1));
        for chunk in &chunks {
            prop_assert!(
                chunk.chars().count() <= size,
                "Chunk size {} exceeds max {}",
                chunk.chars().count(),
                size
            );
        }
    }

    #[test]
    fn recursive_without_overlap_is_lossless(text in structured_text(), size in 1usize..120) {
        let chunks = split(&text, size, 0);
        prop_assert_eq!(strip_whitespace(&chunks.concat()), strip_whitespace(&text));
    }

    #[test]
    fn recursive_atomic_fragments_only_when_out_of_separators(
        text in structured_text(),
        size in 1usize..60,
    ) {
        // No character fallback: an oversized chunk must be a single word.
        let options = TextSplitterOptions::new(size, &["\n\n", "\n", " "]);
        let chunks = split_recursive(&text, &CharCount, &options).unwrap();
        for chunk in chunks.iter().filter(|c| c.chars().count() > size) {
            prop_assert!(!chunk.contains(' ') && !chunk.contains('\n'), "{:?}", chunk);
        }
    }

    #[test]
    fn recursive_is_deterministic(text in arbitrary_text(), size in 1usize..80) {
        prop_assert_eq!(split(&text, size, 0), split(&text, size, 0));
    }
}

// =============================================================================
// Sentences and Grouping
// =============================================================================

proptest! {
    #[test]
    fn sentences_are_trimmed_slices(text in arbitrary_text()) {
        let sentences = split_sentences(&text);
        let mut last_end = 0;
        for (i, sentence) in sentences.iter().enumerate() {
            prop_assert_eq!(sentence.index, i);
            prop_assert!(sentence.start >= last_end);
            prop_assert_eq!(&text[sentence.start..sentence.end()], sentence.text);
            prop_assert!(!sentence.text.is_empty());
            prop_assert_eq!(sentence.text.trim(), sentence.text);
            last_end = sentence.end();
        }
    }

    #[test]
    fn group_ranges_partition(count in 0usize..50, raw in prop::collection::vec(0usize..60, 0..10)) {
        let mut breakpoints = raw;
        breakpoints.sort_unstable();
        breakpoints.dedup();

        let ranges = group_ranges(count, &breakpoints);
        let mut next = 0;
        for range in &ranges {
            prop_assert_eq!(range.start, next);
            prop_assert!(range.end > range.start);
            next = range.end;
        }
        prop_assert_eq!(next, count);
    }
}

// =============================================================================
// Semantic Splitter
// =============================================================================

/// Toy embedding from letter statistics: deterministic and text-dependent.
fn letter_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0_f32; 5];
    for c in text.chars() {
        match c {
            'a'..='e' => v[0] += 1.0,
            'f'..='j' => v[1] += 1.0,
            'k'..='o' => v[2] += 1.0,
            'p'..='t' => v[3] += 1.0,
            _ => v[4] += 1.0,
        }
    }
    v
}

fn run_semantic(text: &str, options: &SemanticTextSplitterOptions) -> Vec<String> {
    let generator = FnGenerator::new(|texts: Vec<String>, _cancel: CancellationToken| async move {
        anyhow::Ok(texts.iter().map(|t| letter_vector(t)).collect::<Vec<_>>())
    });
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(split_semantic(
            text,
            &generator,
            &CharCount,
            options,
            &CancellationToken::new(),
        ))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn semantic_chunks_reassemble_sentences(
        text in prose(),
        buffer_size in 0usize..3,
        max in prop::option::of(10usize..80),
        retries in prop::option::of(0usize..3),
    ) {
        let mut options = SemanticTextSplitterOptions::default().with_buffer_size(buffer_size);
        options.max_chunk_size = max;
        options.chunk_split_retry_limit = retries;

        let chunks = run_semantic(&text, &options);
        let sentences: Vec<&str> = split_sentences(&text).iter().map(|s| s.text).collect();

        prop_assert!(chunks.iter().all(|c| !c.is_empty()));
        prop_assert!(chunks.len() <= sentences.len().max(1));
        if sentences.len() > 1 {
            prop_assert_eq!(chunks.join(" "), sentences.join(" "));
        }
    }

    #[test]
    fn semantic_is_deterministic(text in prose()) {
        let options = SemanticTextSplitterOptions::default();
        prop_assert_eq!(run_semantic(&text, &options), run_semantic(&text, &options));
    }
}
