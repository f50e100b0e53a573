//! Page text extraction and normalization.
//!
//! Raw page text comes from a [`PageSource`]; the extractor numbers
//! the pages, cleans the text and drops pages that end up empty.
//! Numbering happens before dropping, so page numbers always refer
//! to the physical page in the file.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use crate::core::error::{PdfVecError, Result};
use crate::core::types::{ExtractedDocument, Page, SourceDocument};

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());
static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x1F\x7F-\x9F]").unwrap());

/// Capability that turns a document file into raw per-page text
pub trait PageSource: Send + Sync {
    /// One entry per physical page, in page order (entries may be empty)
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// `PageSource` backed by the `pdf-extract` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractSource;

impl PageSource for PdfExtractSource {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path)
            .map_err(|e| PdfVecError::extraction(path, format!("cannot open file: {e}")))?;

        // pdf-extract panics on some malformed files
        panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| PdfVecError::extraction(path, "PDF parser panicked"))?
        .map_err(|e| PdfVecError::extraction(path, e.to_string()))
    }
}

/// Normalize extracted page text
///
/// Collapses runs of blank lines, replaces control characters with
/// spaces and trims the result. Punctuation and Unicode letters are
/// left untouched.
pub fn clean_text(text: &str) -> String {
    let collapsed = BLANK_LINES.replace_all(text, "\n");
    let printable = CONTROL_CHARS.replace_all(&collapsed, " ");
    printable.trim().to_string()
}

/// Extracts and cleans the pages of source documents
#[derive(Clone)]
pub struct TextExtractor {
    source: Arc<dyn PageSource>,
}

impl TextExtractor {
    /// Create an extractor over the given page source
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Extractor backed by `pdf-extract`
    pub fn pdf() -> Self {
        Self::new(Arc::new(PdfExtractSource))
    }

    /// Extract one document
    ///
    /// Pages without text after cleaning are dropped. A document with
    /// no text at all yields an `ExtractedDocument` with no pages.
    pub fn extract(&self, document: &SourceDocument) -> Result<ExtractedDocument> {
        let raw_pages = self.source.extract_pages(&document.path)?;

        let pages = raw_pages
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                let text = clean_text(raw);
                if text.is_empty() {
                    None
                } else {
                    Some(Page {
                        number: (i + 1) as u32,
                        text,
                    })
                }
            })
            .collect();

        Ok(ExtractedDocument {
            source: document.clone(),
            pages,
        })
    }

    /// Extract many documents, returning results in input order
    ///
    /// With `parallel` set, documents are processed on the rayon pool;
    /// the indexed collect keeps enumeration order regardless of which
    /// document finishes first.
    pub fn extract_all(
        &self,
        documents: &[SourceDocument],
        parallel: bool,
    ) -> Vec<Result<ExtractedDocument>> {
        if parallel {
            documents.par_iter().map(|d| self.extract(d)).collect()
        } else {
            documents.iter().map(|d| self.extract(d)).collect()
        }
    }
}
