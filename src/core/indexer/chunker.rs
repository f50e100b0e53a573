//! Token-bounded sentence chunking with sliding overlap.
//!
//! Page text is split into sentences, and sentences are packed
//! greedily into chunks whose token count stays within
//! `chunk_token_limit`. When a chunk closes, the trailing sentences
//! that fit in `overlap_token_limit` seed the next chunk.
//!
//! The packer is a small state machine:
//!
//! ```text
//!            sentence fits
//!          +--------------+
//!          v              |
//!    ACCUMULATING --------+
//!          |  sentence would overflow
//!          v
//!   OVERLAP_SEEDING  -- emits closed chunk, seeds new buffer --> ACCUMULATING
//!
//!    end of page --> FLUSHING -- emits non-empty buffer
//! ```
//!
//! Sentences are never split. A sentence that is larger than the
//! chunk limit on its own becomes a chunk by itself. Chunks never
//! span pages.
//!
//! # Example
//!
//! ```
//! use pdfvec::core::config::ChunkingConfig;
//! use pdfvec::core::indexer::Chunker;
//! use pdfvec::core::types::Page;
//!
//! let chunker = Chunker::new(ChunkingConfig::new(6, 2).unwrap());
//! let page = Page { number: 1, text: "One two three. Four five. Six seven eight.".into() };
//! let words = |s: &str| Ok(s.split_whitespace().count());
//!
//! let chunks = chunker.chunk_page(&page, words).unwrap();
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].text, "One two three. Four five.");
//! assert_eq!(chunks[1].text, "Four five. Six seven eight.");
//! ```

use crate::core::config::ChunkingConfig;
use crate::core::error::Result;
use crate::core::types::{ExtractedDocument, Page, PageChunk};

/// A sentence and its token count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub tokens: usize,
}

impl Sentence {
    pub fn new(text: impl Into<String>, tokens: usize) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }
}

/// Sentences of the chunk under construction and their token total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkBuffer {
    sentences: Vec<Sentence>,
    tokens: usize,
}

impl ChunkBuffer {
    fn from_sentences(sentences: Vec<Sentence>) -> Self {
        let tokens = sentences.iter().map(|s| s.tokens).sum();
        Self { sentences, tokens }
    }

    fn push(mut self, sentence: Sentence) -> Self {
        self.tokens += sentence.tokens;
        self.sentences.push(sentence);
        self
    }

    fn drop_front(mut self) -> Self {
        if !self.sentences.is_empty() {
            let first = self.sentences.remove(0);
            self.tokens -= first.tokens;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }

    /// Sentences joined with single spaces
    pub fn text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Packer states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkState {
    /// Collecting sentences into the current buffer
    Accumulating(ChunkBuffer),

    /// `closed` is complete; `pending` overflowed it and starts the next chunk
    OverlapSeeding {
        closed: ChunkBuffer,
        pending: Sentence,
    },

    /// End of page reached
    Flushing(ChunkBuffer),
}

/// Feed one sentence to the current buffer
///
/// Returns `OverlapSeeding` when the sentence would push a non-empty
/// buffer over the limit, otherwise `Accumulating` with the sentence
/// appended. An empty buffer always accepts the sentence.
pub fn accumulate(buffer: ChunkBuffer, sentence: Sentence, config: &ChunkingConfig) -> ChunkState {
    if !buffer.is_empty() && buffer.tokens + sentence.tokens > config.chunk_token_limit {
        ChunkState::OverlapSeeding {
            closed: buffer,
            pending: sentence,
        }
    } else {
        ChunkState::Accumulating(buffer.push(sentence))
    }
}

/// Trailing sentences of `closed` that fit in the overlap budget
///
/// Walks backwards and stops at the first sentence that would exceed
/// the budget, so the result may be empty.
pub fn seed_overlap(closed: &ChunkBuffer, overlap_token_limit: usize) -> ChunkBuffer {
    let mut tokens = 0;
    let mut count = 0;

    for sentence in closed.sentences.iter().rev() {
        if tokens + sentence.tokens > overlap_token_limit {
            break;
        }
        tokens += sentence.tokens;
        count += 1;
    }

    let start = closed.sentences.len() - count;
    ChunkBuffer::from_sentences(closed.sentences[start..].to_vec())
}

/// Start the next chunk from the overlap seed and the pending sentence
///
/// Oldest overlap sentences are dropped until the pending sentence
/// fits under the chunk limit.
pub fn resume(seed: ChunkBuffer, pending: Sentence, config: &ChunkingConfig) -> ChunkBuffer {
    let mut seed = seed;
    while !seed.is_empty() && seed.tokens + pending.tokens > config.chunk_token_limit {
        seed = seed.drop_front();
    }
    seed.push(pending)
}

/// Resolve a state into (emitted chunk, buffer to continue with)
///
/// `Flushing` never yields a buffer to continue with.
pub fn settle(
    state: ChunkState,
    config: &ChunkingConfig,
) -> (Option<ChunkBuffer>, Option<ChunkBuffer>) {
    match state {
        ChunkState::Accumulating(buffer) => (None, Some(buffer)),
        ChunkState::OverlapSeeding { closed, pending } => {
            let seed = seed_overlap(&closed, config.overlap_token_limit);
            let next = resume(seed, pending, config);
            (Some(closed), Some(next))
        }
        ChunkState::Flushing(buffer) => {
            if buffer.is_empty() {
                (None, None)
            } else {
                (Some(buffer), None)
            }
        }
    }
}

/// Pack an ordered sentence sequence into chunk buffers
pub fn pack_sentences(sentences: Vec<Sentence>, config: &ChunkingConfig) -> Vec<ChunkBuffer> {
    let mut chunks = Vec::new();
    let mut buffer = ChunkBuffer::default();

    for sentence in sentences {
        let (emitted, next) = settle(accumulate(buffer, sentence, config), config);
        chunks.extend(emitted);
        buffer = next.unwrap_or_default();
    }

    let (emitted, _) = settle(ChunkState::Flushing(buffer), config);
    chunks.extend(emitted);

    chunks
}

/// Split text after `.`, `!` or `?` followed by whitespace and an
/// upper-case letter
///
/// The whitespace between sentences is discarded. Abbreviations and
/// decimals followed by a capital will split; that is accepted.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();

        let mut next_start = end;
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            next_start = j + w.len_utf8();
            chars.next();
        }
        if next_start == end {
            continue;
        }

        if let Some(&(_, next)) = chars.peek() {
            if next.is_uppercase() {
                sentences.push(&text[start..end]);
                start = next_start;
            }
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences.retain(|s| !s.trim().is_empty());
    sentences
}

/// Sentence packer bound to one chunking configuration
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a new chunker
    ///
    /// # Panics
    ///
    /// Panics if `chunk_token_limit` is 0 or if
    /// `overlap_token_limit >= chunk_token_limit`.
    pub fn new(config: ChunkingConfig) -> Self {
        assert!(
            config.chunk_token_limit > 0,
            "chunk_token_limit must be > 0"
        );
        assert!(
            config.overlap_token_limit < config.chunk_token_limit,
            "overlap_token_limit must be < chunk_token_limit"
        );
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk one page
    ///
    /// `count_tokens` must be the tokenizer of the embedding model
    /// the chunks are destined for.
    pub fn chunk_page<F>(&self, page: &Page, count_tokens: F) -> Result<Vec<PageChunk>>
    where
        F: Fn(&str) -> Result<usize>,
    {
        let sentences = split_sentences(&page.text)
            .into_iter()
            .map(|s| Ok(Sentence::new(s, count_tokens(s)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(pack_sentences(sentences, &self.config)
            .into_iter()
            .map(|buffer| PageChunk {
                page: page.number,
                text: buffer.text(),
                token_count: buffer.tokens(),
            })
            .collect())
    }

    /// Chunk every page of a document, page by page
    pub fn chunk_document<F>(
        &self,
        document: &ExtractedDocument,
        count_tokens: F,
    ) -> Result<Vec<PageChunk>>
    where
        F: Fn(&str) -> Result<usize>,
    {
        let mut chunks = Vec::new();
        for page in &document.pages {
            chunks.extend(self.chunk_page(page, &count_tokens)?);
        }
        Ok(chunks)
    }
}
