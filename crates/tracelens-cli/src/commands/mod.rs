//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracelens_core::AnalyzerConfig;

pub mod analyze;
pub mod check;
pub mod serve;

/// TraceLens - content provenance analysis
#[derive(Parser)]
#[command(name = "tracelens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub upstream: UpstreamArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Upstream credentials and endpoints. Each overrides the config file.
#[derive(Args, Debug, Default)]
pub struct UpstreamArgs {
    /// Chat completion API key
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat completion base URL
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Chat model used for classification and related content
    #[arg(long, global = true, env = "TRACELENS_LLM_MODEL")]
    pub llm_model: Option<String>,

    /// Inference API key
    #[arg(long, global = true, env = "HUGGINGFACE_API_KEY", hide_env_values = true)]
    pub huggingface_api_key: Option<String>,

    /// Inference base URL
    #[arg(long, global = true, env = "HUGGINGFACE_BASE_URL")]
    pub huggingface_base_url: Option<String>,

    /// Hosted model used for spread analysis
    #[arg(long, global = true, env = "TRACELENS_SPREAD_MODEL")]
    pub spread_model: Option<String>,
}

impl UpstreamArgs {
    /// Overlay the values that were given onto `config`.
    pub fn apply(&self, config: &mut AnalyzerConfig) {
        if let Some(key) = &self.openai_api_key {
            config.llm.api_key = Some(key.clone());
        }
        if let Some(url) = &self.openai_base_url {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &self.llm_model {
            config.llm.model = model.clone();
        }
        if let Some(key) = &self.huggingface_api_key {
            config.inference.api_key = Some(key.clone());
        }
        if let Some(url) = &self.huggingface_base_url {
            config.inference.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = &self.spread_model {
            config.inference.model = model.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the analysis API server
    Serve(serve::ServeArgs),

    /// Analyze a single URL
    Analyze(analyze::AnalyzeArgs),

    /// Check upstream connectivity and configuration
    Check,
}

impl Cli {
    /// Defaults, then the config file, then flags and environment.
    pub fn load_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::load(path)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?,
            None => AnalyzerConfig::default(),
        };
        self.upstream.apply(&mut config);
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;

        match self.command {
            Commands::Serve(args) => serve::execute(args, &config).await,
            Commands::Analyze(args) => analyze::execute(args, &config).await,
            Commands::Check => check::execute(&config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = UpstreamArgs {
            openai_api_key: Some("sk-flag".to_string()),
            openai_base_url: Some("http://localhost:8080/v1/".to_string()),
            spread_model: Some("tiiuae/falcon-7b-instruct".to_string()),
            ..Default::default()
        };
        let mut config = AnalyzerConfig::default();
        args.apply(&mut config);

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-flag"));
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.inference.model, "tiiuae/falcon-7b-instruct");
        assert!(config.inference.api_key.is_none());
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = AnalyzerConfig::from_toml_str(
            "[llm]\napi_key = \"sk-file\"\nmodel = \"gpt-4o-mini\"\n",
        )
        .unwrap();
        UpstreamArgs {
            llm_model: Some("gpt-4.1".to_string()),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.llm.model, "gpt-4.1");
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["tracelens", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve(ref a) if a.port == 8080 && a.host == "127.0.0.1"));

        let cli = Cli::try_parse_from(["tracelens", "analyze", "https://example.com", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Analyze(ref a) if a.json && a.url == "https://example.com"));

        assert!(Cli::try_parse_from(["tracelens", "analyze"]).is_err());
    }
}
