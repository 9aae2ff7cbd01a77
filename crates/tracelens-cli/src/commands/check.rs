//! Upstream connectivity check.

use anyhow::Result;
use colored::Colorize;
use tracelens_core::AnalyzerConfig;
use tracelens_inference::InferenceClient;
use tracelens_llm::OpenAiClient;

pub async fn execute(config: &AnalyzerConfig) -> Result<()> {
    println!("{}", "Upstream Check".bold());
    println!("{}", "─".repeat(50));

    let llm = match config.llm.api_key.as_deref().filter(|_| config.llm.is_configured()) {
        Some(key) => {
            let client = OpenAiClient::new(key, &config.llm.model)
                .with_base_url(&config.llm.base_url)
                .with_timeout(config.llm.timeout());
            tracing::debug!(model = client.model(), base_url = client.base_url(), "Checking chat model");
            Some(client.health_check().await?)
        }
        None => None,
    };
    print_status("LLM", &config.llm.base_url, &config.llm.model, llm);

    let inference = match config
        .inference
        .api_key
        .as_deref()
        .filter(|_| config.inference.is_configured())
    {
        Some(key) => {
            let client =
                InferenceClient::new(key, &config.inference.base_url, &config.inference.model)
                    .with_timeout(config.inference.timeout());
            tracing::debug!(model = client.model(), "Checking inference model");
            Some(client.health_check().await?)
        }
        None => None,
    };
    print_status(
        "Inference",
        &config.inference.base_url,
        &config.inference.model,
        inference,
    );

    println!("{}", "─".repeat(50));
    println!(
        "  Fetch timeout {}s, prompt budget {} tokens",
        config.fetch.timeout_secs, config.fetch.max_prompt_tokens
    );

    if llm != Some(true) || inference != Some(true) {
        println!();
        println!(
            "  {}",
            "Unavailable upstreams are replaced with randomly generated data.".dimmed()
        );
    }

    Ok(())
}

fn print_status(label: &str, base_url: &str, model: &str, reachable: Option<bool>) {
    let status = match reachable {
        Some(true) => "✓ reachable".green(),
        Some(false) => "! unreachable".red(),
        None => "- no API key".yellow(),
    };
    println!("  {:<10} {}", label, status);
    println!("  {:<10} {} ({})", "", model, base_url.dimmed());
}
