//! Spread analysis via a hosted text generation model.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

use super::fallback;
use super::model::{clamp_score, Source, SpreadAnalysis};
use super::upstream::TextGenerator;

/// How much of the page text goes into the prompt.
const EXCERPT_BYTES: usize = 2000;

/// Spread result and its provenance.
#[derive(Debug, Clone)]
pub struct SpreadResult {
    pub analysis: SpreadAnalysis,
    pub source: Source,
}

/// Asks a hosted model how the content propagated across platforms.
pub struct SpreadAnalyzer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SpreadAnalyzer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn analyze(&self, url: &str, text: &str) -> SpreadResult {
        let Some(generator) = &self.generator else {
            debug!("No inference model configured, spread analysis falls back");
            return fallback_spread();
        };

        let generated = match generator.generate_text(&build_prompt(url, text)).await {
            Ok(generated) => generated,
            Err(e) => {
                warn!(error = %e, "Spread inference failed, using fallback");
                return fallback_spread();
            }
        };

        match parse_spread(&generated) {
            Ok(analysis) => SpreadResult {
                analysis,
                source: Source::Model,
            },
            Err(e) => {
                warn!(error = %e, "Spread output unusable, using fallback");
                fallback_spread()
            }
        }
    }
}

fn fallback_spread() -> SpreadResult {
    SpreadResult {
        analysis: fallback::spread_analysis(&mut rand::rng(), Utc::now().date_naive()),
        source: Source::Fallback,
    }
}

/// Instruction-formatted prompt for the hosted model.
pub(crate) fn build_prompt(url: &str, text: &str) -> String {
    let excerpt = tracelens_token::truncate_to_char_boundary(text, EXCERPT_BYTES);
    format!(
        r#"[INST] You analyze how online content spreads across social platforms.
Estimate the spread of the content at {url} for the last 7 days.

Content excerpt:
"""
{excerpt}
"""

Respond with ONLY a JSON object of this exact shape:
{{
  "spreadPattern": "Viral" or "Gradual",
  "spreadData": {{
    "timeline": [{{"date": "YYYY-MM-DD", "shares": 0}}],
    "platforms": [{{"name": "Twitter", "shares": 0}}],
    "demographics": [{{"age": "18-24", "percentage": 0}}]
  }},
  "anomalies": [{{"description": "text", "severity": "low" or "medium" or "high"}}]
}} [/INST]"#
    )
}

/// Parse generated text into a spread report.
///
/// Enum fields are validated by deserialization; an empty timeline is
/// rejected and percentages are clamped into [0, 100].
pub(crate) fn parse_spread(generated: &str) -> CoreResult<SpreadAnalysis> {
    let mut analysis: SpreadAnalysis =
        serde_json::from_str(&tracelens_llm::extract_json(generated))?;

    if analysis.spread_data.timeline.is_empty() {
        return Err(CoreError::malformed("spread timeline is empty"));
    }

    for share in &mut analysis.spread_data.demographics {
        share.percentage = clamp_score(share.percentage);
    }

    Ok(analysis)
}
