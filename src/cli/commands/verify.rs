//! Verify command - check an artifact set for completeness

use crate::cli::output::{colors, format_relative_time};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::storage::ArtifactSet;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Artifact directory (defaults to the configured output directory)
    pub dir: Option<PathBuf>,
}

/// Verification response
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub dir: String,
    pub valid: bool,
    pub chunk_count: u64,
    pub dimension: usize,
    pub document_count: usize,
    pub provider: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Execute the verify command
pub fn execute(
    args: VerifyArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = args
        .dir
        .unwrap_or_else(|| config.output.output_dir.clone());

    let set = ArtifactSet::open(&dir)?;
    let manifest = &set.manifest;

    let response = VerifyResponse {
        dir: dir.to_string_lossy().into_owned(),
        valid: true,
        chunk_count: manifest.chunk_count,
        dimension: manifest.dimension,
        document_count: manifest.document_count,
        provider: manifest.provider.clone(),
        created_at: manifest.created_at,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {}",
                colors::success("Valid artifact set:"),
                colors::file_path(&response.dir)
            );
            println!(
                "  {} {}",
                colors::label("Chunks:"),
                colors::number(&response.chunk_count.to_string())
            );
            println!(
                "  {} {}",
                colors::label("Dimension:"),
                colors::number(&response.dimension.to_string())
            );
            println!(
                "  {} {}",
                colors::label("Documents:"),
                colors::number(&response.document_count.to_string())
            );
            println!("  {} {}", colors::label("Provider:"), response.provider);
            println!(
                "  {} {}",
                colors::label("Built:"),
                colors::dim(&format_relative_time(&response.created_at))
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
