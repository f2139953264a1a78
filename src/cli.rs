//! Command-line interface definitions.
//!
//! Every option has a default, and most can also be set through an
//! environment variable.

use crate::feeds::default_feed_url;
use clap::{Parser, ValueEnum};

/// Which dialogue generator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// OpenAI-compatible API configured through awful_aj
    Aj,
    /// Local llama.cpp server
    Llama,
    /// Skip generation and always use the fallback dialogue
    None,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # awful_aj backend with its default config.yaml
/// jornais_hoje -o ./edicoes
///
/// # Local llama.cpp server with custom sampling
/// jornais_hoje -o ./edicoes --backend llama --llama-url http://127.0.0.1:8080 -g params.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the edition JSON files
    #[arg(short, long, env = "JORNAIS_OUTPUT_DIR", default_value = ".")]
    pub output_dir: String,

    /// RSS feed to pick the news item from
    #[arg(long, env = "JORNAIS_FEED_URL", default_value_t = default_feed_url())]
    pub feed_url: String,

    /// Dialogue generator backend
    #[arg(short, long, value_enum, env = "JORNAIS_BACKEND", default_value_t = BackendKind::Aj)]
    pub backend: BackendKind,

    /// Optional path to the awful_aj config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// awful_aj chat template name
    #[arg(short, long, default_value = "dialogo_filosofico")]
    pub template: String,

    /// Base URL of the llama.cpp server
    #[arg(long, env = "LLAMA_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    pub llama_url: String,

    /// Optional YAML file overriding the generation parameters
    #[arg(short, long)]
    pub generation_config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["jornais_hoje"]);
        assert_eq!(cli.backend, BackendKind::Aj);
        assert_eq!(cli.template, "dialogo_filosofico");
        assert!(cli.feed_url.starts_with("https://news.google.com/rss/search"));
        assert!(cli.config.is_none());
        assert!(cli.generation_config.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "jornais_hoje",
            "--output-dir",
            "./edicoes",
            "--backend",
            "llama",
            "--llama-url",
            "http://10.0.0.2:8080",
            "--generation-config",
            "params.yaml",
        ]);

        assert_eq!(cli.output_dir, "./edicoes");
        assert_eq!(cli.backend, BackendKind::Llama);
        assert_eq!(cli.llama_url, "http://10.0.0.2:8080");
        assert_eq!(cli.generation_config.as_deref(), Some("params.yaml"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "jornais_hoje",
            "-o",
            "/tmp/edicoes",
            "-b",
            "none",
            "-c",
            "/etc/aj/config.yaml",
            "-t",
            "outro_template",
        ]);

        assert_eq!(cli.output_dir, "/tmp/edicoes");
        assert_eq!(cli.backend, BackendKind::None);
        assert_eq!(cli.config.as_deref(), Some("/etc/aj/config.yaml"));
        assert_eq!(cli.template, "outro_template");
    }
}
