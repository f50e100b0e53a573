//! CLI adapter for pdfvec
//!
//! Thin command-line layer over `core/`: argument parsing, config
//! overrides and output formatting. No domain logic lives here.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// pdfvec - PDF corpus to semantic vector index
///
/// Extracts text from directories of PDF files, splits it into
/// token-bounded overlapping chunks, embeds them and writes an
/// L2 vector index with matching chunk and metadata stores.
#[derive(Parser, Debug)]
#[command(name = "pdfvec")]
#[command(version)]
#[command(about = "Build a semantic vector index from PDF documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the vector index from the configured source directories
    Build(commands::BuildArgs),

    /// Verify an existing artifact set
    Verify(commands::VerifyArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  pdfvec completions bash > ~/.local/share/bash-completion/completions/pdfvec
    ///   zsh:   pdfvec completions zsh > ~/.zfunc/_pdfvec
    ///   fish:  pdfvec completions fish > ~/.config/fish/completions/pdfvec.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    // Completions need no configuration
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, config, cli.format).await,
        Commands::Verify(args) => commands::verify::execute(args, &config, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
