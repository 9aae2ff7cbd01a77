//! Analysis domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of the fetched content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub content_type: String,
    pub first_seen: String,
    pub ai_probability: f64,
}

/// Coarse label for how content propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadPattern {
    #[serde(alias = "viral", alias = "VIRAL")]
    Viral,
    #[serde(alias = "gradual", alias = "GRADUAL")]
    Gradual,
}

/// Anomaly severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: String,
    pub shares: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    pub name: String,
    pub shares: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicShare {
    pub age: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadData {
    pub timeline: Vec<TimelinePoint>,
    pub platforms: Vec<PlatformShare>,
    pub demographics: Vec<DemographicShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub description: String,
    pub severity: Severity,
}

/// How content spread across platforms over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadAnalysis {
    pub spread_pattern: SpreadPattern,
    pub spread_data: SpreadData,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

/// A URL hypothesized to share origin with the analyzed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedContentItem {
    pub url: String,
    pub similarity: f64,
    pub ai_probability: f64,
}

/// The composite report returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub url: String,
    pub content_type: String,
    pub first_seen: String,
    pub spread_pattern: SpreadPattern,
    pub ai_probability: f64,
    pub spread_data: SpreadData,
    pub related_content: Vec<RelatedContentItem>,
    pub anomalies: Vec<Anomaly>,
}

impl AnalysisResponse {
    /// Merge the component results into one response.
    pub fn assemble(
        url: &str,
        content: ContentAnalysis,
        spread: SpreadAnalysis,
        related_content: Vec<RelatedContentItem>,
    ) -> Self {
        Self {
            url: url.to_string(),
            content_type: content.content_type,
            first_seen: content.first_seen,
            spread_pattern: spread.spread_pattern,
            ai_probability: content.ai_probability,
            spread_data: spread.spread_data,
            related_content,
            anomalies: spread.anomalies,
        }
    }
}

/// Where a part of the report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Model,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Fallback => "fallback",
        }
    }
}

/// Whether the analyzed text was the live page or the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchOrigin {
    Live,
    Placeholder,
}

impl FetchOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Placeholder => "placeholder",
        }
    }
}

/// Per-component provenance of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub fetch: FetchOrigin,
    pub classification: Source,
    pub spread: Source,
    pub related: Source,
}

impl Provenance {
    /// True when no part of the report came from a model.
    pub fn is_fully_synthetic(&self) -> bool {
        self.classification == Source::Fallback
            && self.spread == Source::Fallback
            && self.related == Source::Fallback
    }
}

/// Rendered as the `x-tracelens-provenance` header value.
impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetch={}; classification={}; spread={}; related={}",
            self.fetch.as_str(),
            self.classification.as_str(),
            self.spread.as_str(),
            self.related.as_str()
        )
    }
}

/// Pipeline output: the response body plus its provenance.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub response: AnalysisResponse,
    pub provenance: Provenance,
}

/// Clamp a model-supplied score into [0, 100].
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
