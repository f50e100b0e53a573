//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the config command
pub fn execute(
    _args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let xdg = XdgDirs::new();
    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        config,
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  corpus:");
            println!("    source_dirs: {:?}", config.corpus.source_dirs);
            println!("    include_patterns: {:?}", config.corpus.include_patterns);
            println!("    exclude_patterns: {:?}", config.corpus.exclude_patterns);
            println!("  chunking:");
            println!("    chunk_token_limit: {}", config.chunking.chunk_token_limit);
            println!(
                "    overlap_token_limit: {}",
                config.chunking.overlap_token_limit
            );
            println!("  embedding:");
            println!("    provider: {}", config.embedding.provider);
            println!("    model: {}", config.embedding.model);
            println!("    base_url: {}", config.embedding.resolved_base_url());
            println!("    tokenizer_file: {:?}", config.embedding.tokenizer_file);
            println!("    batch_size: {}", config.embedding.batch_size);
            println!("  output:");
            println!("    output_dir: {:?}", config.output.output_dir);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
