//! pdfvec CLI - build a semantic vector index from PDF documents
//!
//! # Examples
//!
//! ```bash
//! # Build with the configured source directories
//! pdfvec build
//!
//! # Override batch size and output directory
//! pdfvec build --batch-size 16 --output ./vector_db
//!
//! # Check an existing artifact set
//! pdfvec verify ./vector_db
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` to change verbosity and
//! `PDFVEC_LOG_FORMAT=json` for structured logs.

use clap::Parser;
use pdfvec::cli::output::print_error;
use pdfvec::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "pdfvec=info".into());
    let json = std::env::var("PDFVEC_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
