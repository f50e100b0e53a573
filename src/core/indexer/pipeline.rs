//! Indexing pipeline orchestration.
//!
//! Coordinates the end-to-end build:
//! 1. Collect PDF files from the source directories
//! 2. Extract page text (in parallel, merged back in input order)
//! 3. Chunk pages and assign global ordinals
//! 4. Embed chunks in ordered batches
//! 5. Build the vector index and persist all artifacts atomically
//!
//! Each stage completes before the next one starts.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::core::config::{ChunkingConfig, Config};
use crate::core::embedding::{build_provider, EmbeddingBatcher, EmbeddingProvider};
use crate::core::error::{PdfVecError, Result};
use crate::core::indexer::{Chunker, FileCollector, TextExtractor};
use crate::core::storage::{persist, IndexBuilder, RunInfo};
use crate::core::types::{Chunk, ExtractedDocument, IndexStats, MetadataRecord, SourceDocument};

/// Chunks and metadata for the whole corpus, in ordinal order
#[derive(Debug, Default)]
pub struct PreparedCorpus {
    pub chunks: Vec<Chunk>,
    pub metadata: Vec<MetadataRecord>,
    pub documents_found: usize,
    pub documents_indexed: usize,
    pub documents_skipped: usize,
}

/// Orchestrates the indexing pipeline
pub struct IndexingPipeline {
    source_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
    collector: FileCollector,
    extractor: TextExtractor,
    chunker: Chunker,
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    parallel: bool,
    threads: usize,
}

impl IndexingPipeline {
    /// Create a pipeline with explicit extractor and provider
    pub fn new(
        config: &Config,
        extractor: TextExtractor,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let collector = FileCollector::new(
            config.corpus.include_patterns.clone(),
            config.corpus.exclude_patterns.clone(),
            config.corpus.max_file_size_mb,
            config.corpus.create_missing_dirs,
        )?;

        Ok(Self {
            source_dirs: config.corpus.source_dirs.clone(),
            output_dir: config.output.output_dir.clone(),
            collector,
            extractor,
            chunker: Chunker::new(config.chunking),
            provider,
            batch_size: config.embedding.batch_size,
            parallel: config.extraction.parallel,
            threads: config.extraction.threads,
        })
    }

    /// Create a pipeline using `pdf-extract` and the configured provider
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = build_provider(&config.embedding)?;
        Self::new(config, TextExtractor::pdf(), provider)
    }

    pub fn chunking(&self) -> &ChunkingConfig {
        self.chunker.config()
    }

    /// Collect, extract and chunk the corpus
    ///
    /// Documents that fail extraction are logged and skipped. The
    /// result may be empty; [`IndexingPipeline::run`] treats that as
    /// an error.
    pub fn prepare(&self) -> Result<PreparedCorpus> {
        tracing::info!("Starting file collection from {:?}", self.source_dirs);
        let collection = self.collector.collect(&self.source_dirs)?;
        tracing::info!("Found {} PDF files to index", collection.found());

        let documents = collection.documents;
        let extracted = self.extract(&documents)?;

        let mut corpus = PreparedCorpus {
            documents_found: documents.len() + collection.oversized.len(),
            documents_skipped: collection.oversized.len(),
            ..PreparedCorpus::default()
        };

        for (idx, (document, result)) in documents.iter().zip(extracted).enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} documents processed", idx, documents.len());
            }

            match result {
                Ok(extracted) => {
                    let added = self.append_document(&extracted, &mut corpus)?;
                    if added > 0 {
                        corpus.documents_indexed += 1;
                        tracing::debug!("Indexed {:?} ({} chunks)", document.path, added);
                    } else {
                        tracing::debug!("No extractable text in {:?}", document.path);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Skipping {:?}: {}", document.path, e);
                    corpus.documents_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Chunking complete: {} documents indexed, {} skipped, {} chunks created",
            corpus.documents_indexed,
            corpus.documents_skipped,
            corpus.chunks.len()
        );

        Ok(corpus)
    }

    fn extract(&self, documents: &[SourceDocument]) -> Result<Vec<Result<ExtractedDocument>>> {
        if self.parallel && self.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| PdfVecError::Config(format!("Failed to build thread pool: {e}")))?;
            return Ok(pool.install(|| self.extractor.extract_all(documents, true)));
        }
        Ok(self.extractor.extract_all(documents, self.parallel))
    }

    /// Chunk one document onto the end of the corpus; returns chunks added
    fn append_document(
        &self,
        document: &ExtractedDocument,
        corpus: &mut PreparedCorpus,
    ) -> Result<usize> {
        let page_chunks = self
            .chunker
            .chunk_document(document, |text| self.provider.count_tokens(text))?;

        let added = page_chunks.len();
        for page_chunk in page_chunks {
            let ordinal = corpus.chunks.len() as u64;
            corpus.metadata.push(MetadataRecord {
                source: document.source.title.clone(),
                page: page_chunk.page,
                category: document.source.category.clone(),
            });
            corpus.chunks.push(Chunk {
                ordinal,
                text: page_chunk.text,
                source_path: document.source.path.clone(),
                page: page_chunk.page,
            });
        }
        Ok(added)
    }

    /// Run the full build and write the artifact set
    ///
    /// Nothing is written unless every stage succeeds. An empty corpus
    /// fails before the embedding provider is called.
    pub async fn run(&self) -> Result<IndexStats> {
        let start = Instant::now();

        let corpus = self.prepare()?;
        let extraction_ms = start.elapsed().as_millis() as u64;

        if corpus.chunks.is_empty() {
            return Err(PdfVecError::EmptyCorpus);
        }

        let texts: Vec<String> = corpus.chunks.into_iter().map(|c| c.text).collect();

        tracing::info!(
            "Embedding {} chunks with {} (batch size {})",
            texts.len(),
            self.provider.name(),
            self.batch_size
        );
        let embed_start = Instant::now();
        let embeddings = EmbeddingBatcher::new(Arc::clone(&self.provider), self.batch_size)
            .embed_all(&texts)
            .await?;
        let embedding_ms = embed_start.elapsed().as_millis() as u64;

        let index = IndexBuilder::build(&embeddings)?;

        let run = RunInfo {
            document_count: corpus.documents_indexed,
            chunking: *self.chunker.config(),
            provider: self.provider.name(),
        };
        persist(&self.output_dir, &index, &texts, &corpus.metadata, &run)?;

        let stats = IndexStats {
            documents_found: corpus.documents_found,
            documents_indexed: corpus.documents_indexed,
            documents_skipped: corpus.documents_skipped,
            chunks_created: texts.len(),
            dimension: index.dimension(),
            extraction_ms,
            embedding_ms,
            total_ms: start.elapsed().as_millis() as u64,
            output_dir: self.output_dir.clone(),
        };

        tracing::info!(
            "Indexing complete: {} chunks from {} documents in {}ms",
            stats.chunks_created,
            stats.documents_indexed,
            stats.total_ms
        );

        Ok(stats)
    }
}
