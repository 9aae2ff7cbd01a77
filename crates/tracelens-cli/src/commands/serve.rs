//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;
use tracelens_core::{Analyzer, AnalyzerConfig};

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "3040")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

pub async fn execute(args: ServeArgs, config: &AnalyzerConfig) -> Result<()> {
    let analyzer = Arc::new(Analyzer::from_config(config));

    println!();
    println!("  {} {}", "TraceLens".cyan().bold(), "Analysis API".bold());
    println!();
    println!(
        "  {}  POST http://{}:{}/api/analyze",
        "Analyze".green(),
        args.host,
        args.port
    );
    println!(
        "  {}   GET  http://{}:{}/health",
        "Health".green(),
        args.host,
        args.port
    );
    println!();
    print_upstream("LLM", analyzer.llm_configured(), &config.llm.model);
    print_upstream("Inference", analyzer.inference_configured(), &config.inference.model);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    tracelens_web::run_server(analyzer, &args.host, args.port).await?;

    Ok(())
}

fn print_upstream(label: &str, configured: bool, model: &str) {
    if configured {
        println!("  {:<10} {}", label, model);
    } else {
        println!(
            "  {:<10} {}",
            label,
            "not configured, using fallback data".yellow()
        );
    }
}
