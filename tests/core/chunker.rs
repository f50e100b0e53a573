//! Chunker property tests
//!
//! Pages are generated from sentence token lengths, chunked with a
//! whitespace tokenizer and checked for:
//! - lossless reconstruction once overlap is removed
//! - the token limit (single oversized sentences excepted)
//! - overlap equal to the budgeted tail of the previous chunk
//! - determinism

use crate::common::words;
use pdfvec::core::config::ChunkingConfig;
use pdfvec::core::indexer::chunker::split_sentences;
use pdfvec::core::indexer::Chunker;
use pdfvec::core::types::{Page, PageChunk};

/// Small linear congruential generator for reproducible cases
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

/// Sentence `i` with `n` whitespace tokens: "S{i} w w ... w."
fn sentence(i: usize, n: usize) -> String {
    let mut s = format!("S{i}");
    for _ in 1..n {
        s.push_str(" w");
    }
    s.push('.');
    s
}

fn page_of(lengths: &[usize]) -> (Page, Vec<String>) {
    let sentences: Vec<String> = lengths
        .iter()
        .enumerate()
        .map(|(i, &n)| sentence(i, n))
        .collect();
    let page = Page {
        number: 1,
        text: sentences.join(" "),
    };
    (page, sentences)
}

fn sentences_of(chunk: &PageChunk) -> Vec<String> {
    split_sentences(&chunk.text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn tokens(sentences: &[String]) -> usize {
    sentences.iter().map(|s| words(s).unwrap()).sum()
}

/// Number of leading sentences of `next` repeated from the end of `prev`
fn overlap_len(prev: &[String], next: &[String]) -> usize {
    match prev.iter().position(|s| s == &next[0]) {
        Some(pos) => {
            let k = prev.len() - pos;
            assert_eq!(&next[..k], &prev[pos..], "overlap must be a contiguous tail");
            k
        }
        None => 0,
    }
}

/// Overlap the packer should carry from `prev` into a chunk whose
/// first new sentence has `pending` tokens
fn expected_overlap(prev: &[String], pending: usize, config: &ChunkingConfig) -> usize {
    let mut seed: Vec<usize> = Vec::new();
    for s in prev.iter().rev() {
        let n = words(s).unwrap();
        if seed.iter().sum::<usize>() + n > config.overlap_token_limit {
            break;
        }
        seed.insert(0, n);
    }
    while !seed.is_empty() && seed.iter().sum::<usize>() + pending > config.chunk_token_limit {
        seed.remove(0);
    }
    seed.len()
}

fn check_properties(lengths: &[usize], config: ChunkingConfig) {
    let (page, original) = page_of(lengths);
    let chunker = Chunker::new(config);
    let chunks = chunker.chunk_page(&page, words).unwrap();

    let per_chunk: Vec<Vec<String>> = chunks.iter().map(sentences_of).collect();

    // Token limit
    for (chunk, sentences) in chunks.iter().zip(&per_chunk) {
        assert_eq!(chunk.token_count, tokens(sentences));
        if sentences.len() > 1 {
            assert!(
                chunk.token_count <= config.chunk_token_limit,
                "chunk of {} tokens exceeds limit {} for {:?}",
                chunk.token_count,
                config.chunk_token_limit,
                lengths
            );
        }
    }

    // Reconstruction and overlap
    let mut rebuilt: Vec<String> = per_chunk.first().cloned().unwrap_or_default();
    for pair in per_chunk.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let k = overlap_len(prev, next);
        assert!(k < next.len(), "a chunk must add at least one new sentence");

        let pending = words(&next[k]).unwrap();
        assert_eq!(
            k,
            expected_overlap(prev, pending, &config),
            "unexpected overlap for {lengths:?}"
        );
        rebuilt.extend(next[k..].iter().cloned());
    }
    assert_eq!(rebuilt, original, "sentences lost or duplicated for {lengths:?}");

    // Determinism
    assert_eq!(chunker.chunk_page(&page, words).unwrap(), chunks);
}

#[test]
fn test_generated_pages_default_budgets() {
    let mut rng = Lcg(42);
    let config = ChunkingConfig::default();
    for _ in 0..200 {
        let count = 1 + rng.next(30);
        let lengths: Vec<usize> = (0..count).map(|_| 1 + rng.next(60)).collect();
        check_properties(&lengths, config);
    }
}

#[test]
fn test_generated_pages_with_oversized_sentences() {
    let mut rng = Lcg(7);
    let config = ChunkingConfig::new(40, 15).unwrap();
    for _ in 0..200 {
        let count = 1 + rng.next(25);
        let lengths: Vec<usize> = (0..count)
            .map(|_| if rng.next(6) == 0 { 41 + rng.next(40) } else { 1 + rng.next(20) })
            .collect();
        check_properties(&lengths, config);
    }
}

#[test]
fn test_generated_pages_tight_overlap() {
    let mut rng = Lcg(2024);
    let config = ChunkingConfig::new(10, 9).unwrap();
    for _ in 0..200 {
        let count = 1 + rng.next(20);
        let lengths: Vec<usize> = (0..count).map(|_| 1 + rng.next(9)).collect();
        check_properties(&lengths, config);
    }
}

#[test]
fn test_oversized_single_sentence_not_split() {
    let (page, _) = page_of(&[200]);
    let chunks = Chunker::new(ChunkingConfig::new(120, 25).unwrap())
        .chunk_page(&page, words)
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].token_count, 200);
}

#[test]
fn test_fifty_token_sentences_give_two_chunks() {
    let (page, sentences) = page_of(&[50, 50, 50]);
    let chunks = Chunker::new(ChunkingConfig::new(120, 25).unwrap())
        .chunk_page(&page, words)
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].token_count, 100);
    assert_eq!(chunks[0].text, format!("{} {}", sentences[0], sentences[1]));
    assert_eq!(chunks[1].text, sentences[2]);
}

#[test]
fn test_multibyte_text_is_preserved() {
    let page = Page {
        number: 4,
        text: "Die Übermittlung ist zulässig. Ça dépend du contexte. 数据 保护 很 重要.".to_string(),
    };
    let chunks = Chunker::new(ChunkingConfig::new(6, 2).unwrap())
        .chunk_page(&page, words)
        .unwrap();

    let all: String = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
    assert!(all.contains("Übermittlung"));
    assert!(all.contains("Ça dépend"));
    assert!(all.contains("数据"));
    assert!(chunks.iter().all(|c| c.page == 4));
}
