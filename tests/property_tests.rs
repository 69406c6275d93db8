//! Property-based tests for normalization, chunking, and aggregation.
//!
//! These tests verify the invariants the pipeline relies on:
//! - Normalization is idempotent and leaves no whitespace runs or padding
//! - Chunks partition the word sequence exactly, in order
//! - Chunks respect the word limit, and only the last may be short
//! - Aggregation is a newline join in fragment order

use proptest::prelude::*;
use precis::{aggregate, normalize, ChunkCapacity, Chunker, Slab, WordChunker};

// =============================================================================
// Test Generators
// =============================================================================

/// Arbitrary text, heavy on whitespace of every kind.
fn messy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::string::string_regex("[A-Za-z0-9.,;]{1,12}").unwrap(),
            prop::string::string_regex("[ \t\n\r]{1,5}").unwrap(),
            Just("\u{a0}".to_string()),
            Just("\u{3000}".to_string()),
            Just("\u{1f}".to_string()),
            Just("日本語".to_string()),
        ],
        0..80,
    )
    .prop_map(|parts| parts.concat())
}

/// Any string at all.
fn arbitrary_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(".{0,300}").unwrap()
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Whitespace plus the ASCII information separators.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn words_of(text: &str) -> Vec<&str> {
    text.split(is_separator).filter(|w| !w.is_empty()).collect()
}

fn chunker(words: usize) -> WordChunker {
    WordChunker::new(ChunkCapacity::new(words).unwrap())
}

/// Flatten chunks back into one word sequence.
fn rejoined_words(slabs: &[Slab]) -> Vec<String> {
    slabs
        .iter()
        .flat_map(|s| s.text.split(' ').map(str::to_string))
        .collect()
}

// =============================================================================
// Normalizer
// =============================================================================

proptest! {
    #[test]
    fn normalize_is_idempotent(text in messy_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_any_string(text in arbitrary_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_leaves_no_whitespace_runs(text in messy_text()) {
        let out = normalize(&text);
        let chars: Vec<char> = out.chars().collect();
        for pair in chars.windows(2) {
            prop_assert!(!(is_separator(pair[0]) && is_separator(pair[1])));
        }
        prop_assert!(!out.starts_with(is_separator));
        prop_assert!(!out.ends_with(is_separator));
    }

    #[test]
    fn normalize_only_uses_ascii_space(text in messy_text()) {
        let out = normalize(&text);
        prop_assert!(out.chars().all(|c| !is_separator(c) || c == ' '));
    }

    #[test]
    fn normalize_preserves_words(text in messy_text()) {
        let out = normalize(&text);
        prop_assert_eq!(words_of(&out), words_of(&text));
    }
}

// =============================================================================
// Chunker
// =============================================================================

proptest! {
    #[test]
    fn chunks_partition_words(text in messy_text(), size in 1usize..40) {
        let slabs = chunker(size).chunk(&text);
        let expected: Vec<String> = words_of(&text).into_iter().map(str::to_string).collect();
        prop_assert_eq!(rejoined_words(&slabs), expected);
    }

    #[test]
    fn chunks_respect_size(text in messy_text(), size in 1usize..40) {
        let slabs = chunker(size).chunk(&text);
        for slab in &slabs {
            prop_assert!(slab.words <= size);
            prop_assert_eq!(slab.words, slab.text.split(' ').count());
        }
        // All chunks except possibly the last are full
        for slab in slabs.iter().take(slabs.len().saturating_sub(1)) {
            prop_assert_eq!(slab.words, size);
        }
    }

    #[test]
    fn chunk_count_matches_word_count(text in messy_text(), size in 1usize..40) {
        let slabs = chunker(size).chunk(&text);
        let words = words_of(&text).len();
        prop_assert_eq!(slabs.len(), words.div_ceil(size));
    }

    #[test]
    fn chunks_indexed_and_ordered(text in messy_text(), size in 1usize..40) {
        let slabs = chunker(size).chunk(&text);
        for (i, slab) in slabs.iter().enumerate() {
            prop_assert_eq!(slab.index, i);
        }
        for pair in slabs.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn normalized_spans_slice_chunk_text(text in messy_text(), size in 1usize..40) {
        let normalized = normalize(&text);
        for slab in chunker(size).chunk(&normalized) {
            prop_assert_eq!(&normalized[slab.span()], slab.text.as_str());
        }
    }
}

// =============================================================================
// Aggregator
// =============================================================================

proptest! {
    #[test]
    fn aggregate_is_newline_join(fragments in prop::collection::vec(arbitrary_text(), 0..10)) {
        prop_assert_eq!(aggregate(&fragments), fragments.join("\n"));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn empty_input_produces_no_chunks() {
    assert!(chunker(500).chunk("").is_empty());
    assert!(chunker(500).chunk(&normalize("\n\n \t")).is_empty());
}

#[test]
fn fewer_words_than_capacity_is_one_chunk() {
    let slabs = chunker(500).chunk("just a few words");
    assert_eq!(slabs.len(), 1);
    assert_eq!(slabs[0].words, 4);
}

#[test]
fn very_long_word_is_one_word() {
    let text = "a".repeat(10_000);
    let slabs = chunker(1).chunk(&text);
    assert_eq!(slabs.len(), 1);
    assert_eq!(slabs[0].len(), 10_000);
}

#[test]
fn chunking_is_deterministic() {
    let text = "The quick brown fox jumps over the lazy dog. Pack my box.";
    let chunker = chunker(4);
    assert_eq!(chunker.chunk(text), chunker.chunk(text));
}
