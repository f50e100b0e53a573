//! Build command - run the full indexing pipeline

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::indexer::IndexingPipeline;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Chunks per embedding request
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// Directory to write the artifact set to
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Source directory (can be specified multiple times; replaces configured list)
    #[arg(long = "source", short = 's')]
    pub sources: Vec<PathBuf>,

    /// Maximum tokens per chunk
    #[arg(long)]
    pub chunk_tokens: Option<usize>,

    /// Maximum tokens carried over between chunks
    #[arg(long)]
    pub overlap_tokens: Option<usize>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl BuildArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(batch_size) = self.batch_size {
            config.embedding.batch_size = batch_size;
        }
        if let Some(output) = &self.output {
            config.output.output_dir = output.clone();
        }
        if !self.sources.is_empty() {
            config.corpus.source_dirs = self.sources.clone();
        }
        if let Some(limit) = self.chunk_tokens {
            config.chunking.chunk_token_limit = limit;
        }
        if let Some(overlap) = self.overlap_tokens {
            config.chunking.overlap_token_limit = overlap;
        }
    }
}

/// Build result response
#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub output_dir: String,
    pub documents_found: usize,
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub chunks_created: usize,
    pub dimension: usize,
    pub duration_secs: f64,
    pub embedding_secs: f64,
}

/// Execute the build command
pub async fn execute(
    args: BuildArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config);
    config.validate()?;
    config.log_config();

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} source directories into {}...",
            colors::number(&config.corpus.source_dirs.len().to_string()),
            colors::file_path(&config.output.output_dir.display().to_string())
        );
    }

    let pipeline = IndexingPipeline::from_config(&config)?;
    let stats = pipeline.run().await?;

    let response = BuildResponse {
        output_dir: stats.output_dir.to_string_lossy().into_owned(),
        documents_found: stats.documents_found,
        documents_indexed: stats.documents_indexed,
        documents_skipped: stats.documents_skipped,
        chunks_created: stats.chunks_created,
        dimension: stats.dimension,
        duration_secs: stats.total_ms as f64 / 1000.0,
        embedding_secs: stats.embedding_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents ({} chunks, dimension {}) in {}",
                colors::success("Indexed"),
                colors::number(&response.documents_indexed.to_string()),
                colors::number(&response.chunks_created.to_string()),
                colors::number(&response.dimension.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            if response.documents_skipped > 0 {
                println!(
                    "{} {} of {} documents could not be read",
                    colors::warning("Skipped"),
                    colors::number(&response.documents_skipped.to_string()),
                    response.documents_found
                );
            }
            println!(
                "Output: {}",
                colors::file_path(&response.output_dir)
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
