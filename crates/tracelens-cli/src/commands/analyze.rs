//! One-off analysis command.

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracelens_core::{Analyzer, AnalyzerConfig};

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// URL to analyze
    pub url: String,

    /// Print the raw JSON response instead of the report
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs, config: &AnalyzerConfig) -> Result<()> {
    let analyzer = Analyzer::from_config(config);

    let spinner = create_spinner(&format!("Analyzing {}", args.url));
    let result = analyzer.analyze(&args.url).await;
    spinner.finish_and_clear();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.response)?);
    } else {
        output::print_report(&report);
    }

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
