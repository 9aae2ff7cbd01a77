//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use tracelens_core::analysis::model::{AnalysisReport, Severity, Source, SpreadPattern};

/// Print an analysis report.
pub fn print_report(report: &AnalysisReport) {
    let response = &report.response;
    let provenance = &report.provenance;

    println!("{}", response.url.cyan().bold());
    println!("{}", "─".repeat(60));
    println!(
        "  Content type:   {} {}",
        response.content_type,
        source_tag(provenance.classification)
    );
    println!("  First seen:     {}", response.first_seen);
    println!(
        "  AI probability: {}",
        score(response.ai_probability)
    );
    println!(
        "  Spread:         {} {}",
        pattern(response.spread_pattern),
        source_tag(provenance.spread)
    );

    let total_shares: u64 = response.spread_data.timeline.iter().map(|p| p.shares).sum();
    println!(
        "  Shares (7d):    {}",
        total_shares.to_string().bold()
    );

    if let Some(top) = response.spread_data.platforms.iter().max_by_key(|p| p.shares) {
        println!("  Top platform:   {} ({} shares)", top.name, top.shares);
    }

    if !response.anomalies.is_empty() {
        println!();
        println!("{}", "Anomalies".bold());
        for anomaly in &response.anomalies {
            println!("  {} {}", severity(anomaly.severity), anomaly.description);
        }
    }

    println!();
    println!(
        "{} {}",
        "Related Content".bold(),
        source_tag(provenance.related)
    );
    if response.related_content.is_empty() {
        println!("  {}", "None found.".dimmed());
    }
    for item in &response.related_content {
        println!(
            "  {:>5.1}% similar  {}  AI {}",
            item.similarity,
            item.url,
            score(item.ai_probability)
        );
    }

    println!("{}", "─".repeat(60));
    println!("  {}", provenance.to_string().dimmed());
    if provenance.is_fully_synthetic() {
        println!(
            "  {}",
            "No upstream answered; every value above is synthetic.".yellow()
        );
    }
}

fn source_tag(source: Source) -> ColoredString {
    match source {
        Source::Model => "".normal(),
        Source::Fallback => "(fallback)".yellow(),
    }
}

fn score(value: f64) -> ColoredString {
    let text = format!("{:.0}%", value);
    if value >= 70.0 {
        text.red()
    } else if value >= 40.0 {
        text.yellow()
    } else {
        text.green()
    }
}

fn pattern(pattern: SpreadPattern) -> ColoredString {
    match pattern {
        SpreadPattern::Viral => "Viral".red(),
        SpreadPattern::Gradual => "Gradual".green(),
    }
}

fn severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::High => "high  ".red().bold(),
        Severity::Medium => "medium".yellow(),
        Severity::Low => "low   ".dimmed(),
    }
}
