//! Tests for the show-config command

use pdfvec::cli::commands::config::{execute, ConfigArgs, ConfigResponse};
use pdfvec::cli::OutputFormat;
use pdfvec::core::config::Config;

#[test]
fn test_show_config_human() {
    let result = execute(ConfigArgs {}, &Config::default(), OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_json() {
    let result = execute(ConfigArgs {}, &Config::default(), OutputFormat::Json);
    assert!(result.is_ok());
}

#[test]
fn test_config_response_flattens_sections() {
    let config = Config::default();
    let response = ConfigResponse {
        config_file: "/etc/pdfvec/config.toml".to_string(),
        config: &config,
    };

    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["config_file"], "/etc/pdfvec/config.toml");
    assert_eq!(json["chunking"]["chunk_token_limit"], 120);
    assert_eq!(json["embedding"]["provider"], "ollama");
    assert_eq!(json["output"]["output_dir"], "vector_db");
}
