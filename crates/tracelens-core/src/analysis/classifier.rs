//! Content classification via a chat model.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

use super::fallback;
use super::model::{clamp_score, ContentAnalysis, Source};
use super::upstream::ChatModel;

/// System prompt for the classification call.
const CLASSIFIER_PROMPT: &str = r#"You are an expert in content provenance and AI-generated text detection.
Analyze the text provided by the user and respond with ONLY a JSON object of this exact shape:

{
  "contentType": "Article | Social Media Post | Blog Post | News Report | Press Release | Forum Post | Other",
  "firstSeen": "ISO 8601 timestamp of your best estimate of when this content first appeared",
  "aiProbability": 0-100
}

aiProbability is your confidence, from 0 to 100, that the text was written by a generative AI system."#;

/// Classification result and its provenance.
#[derive(Debug, Clone)]
pub struct Classification {
    pub analysis: ContentAnalysis,
    pub source: Source,
}

/// Asks a chat model what kind of content this is and whether an AI wrote it.
pub struct ContentClassifier {
    model: Option<Arc<dyn ChatModel>>,
}

impl ContentClassifier {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self { model }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub async fn classify(&self, text: &str) -> Classification {
        let Some(model) = &self.model else {
            debug!("No chat model configured, classification falls back");
            return fallback_classification();
        };

        let raw = match model.complete_json(CLASSIFIER_PROMPT, text).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Classification call failed, using fallback");
                return fallback_classification();
            }
        };

        match parse_classification(&raw, Utc::now()) {
            Ok(analysis) => Classification {
                analysis,
                source: Source::Model,
            },
            Err(e) => {
                warn!(error = %e, "Classification output unusable, using fallback");
                fallback_classification()
            }
        }
    }
}

fn fallback_classification() -> Classification {
    Classification {
        analysis: fallback::content_analysis(&mut rand::rng(), Utc::now()),
        source: Source::Fallback,
    }
}

/// Read the model's JSON object; each missing field defaults on its own.
pub(crate) fn parse_classification(raw: &str, now: DateTime<Utc>) -> CoreResult<ContentAnalysis> {
    let value: Value = serde_json::from_str(&tracelens_llm::extract_json(raw))?;
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::malformed("classification is not a JSON object"))?;

    let content_type = object
        .get("contentType")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback::DEFAULT_CONTENT_TYPE)
        .to_string();

    let first_seen = object
        .get("firstSeen")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| now.to_rfc3339());

    let ai_probability = match object.get("aiProbability").and_then(Value::as_f64) {
        Some(score) => clamp_score(score),
        None => fallback::ai_probability(&mut rand::rng()),
    };

    Ok(ContentAnalysis {
        content_type,
        first_seen,
        ai_probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned answer and records the prompts it was given.
    struct CannedChat {
        answer: Result<String, String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl CannedChat {
        fn ok(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(answer.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: Err("connection refused".to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for CannedChat {
        async fn complete_json(&self, system: &str, user: &str) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.answer.clone().map_err(anyhow::Error::msg)
        }
    }

    #[tokio::test]
    async fn test_model_answer_used() {
        let chat = CannedChat::ok(
            r#"{"contentType": "News Report", "firstSeen": "2026-02-01T09:30:00Z", "aiProbability": 87}"#,
        );
        let classifier = ContentClassifier::new(Some(chat.clone()));

        let result = classifier.classify("Breaking: something happened").await;
        assert_eq!(result.source, Source::Model);
        assert_eq!(result.analysis.content_type, "News Report");
        assert_eq!(result.analysis.first_seen, "2026-02-01T09:30:00Z");
        assert_eq!(result.analysis.ai_probability, 87.0);

        let seen = chat.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, CLASSIFIER_PROMPT);
        assert_eq!(seen[0].1, "Breaking: something happened");
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let classifier = ContentClassifier::new(Some(CannedChat::failing()));
        let result = classifier.classify("text").await;
        assert_eq!(result.source, Source::Fallback);
        assert!(fallback::FALLBACK_CONTENT_TYPES.contains(&result.analysis.content_type.as_str()));
        assert!((0.0..100.0).contains(&result.analysis.ai_probability));
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let classifier = ContentClassifier::new(Some(CannedChat::ok("I think this is an article.")));
        let result = classifier.classify("text").await;
        assert_eq!(result.source, Source::Fallback);
        assert!(!result.analysis.first_seen.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_falls_back() {
        let classifier = ContentClassifier::new(None);
        assert!(!classifier.is_configured());
        assert_eq!(classifier.classify("text").await.source, Source::Fallback);
    }

    #[test]
    fn test_missing_fields_default_independently() {
        let now = Utc::now();
        let analysis = parse_classification(r#"{"aiProbability": 12.5}"#, now).unwrap();
        assert_eq!(analysis.content_type, "Article");
        assert_eq!(analysis.first_seen, now.to_rfc3339());
        assert_eq!(analysis.ai_probability, 12.5);

        let analysis = parse_classification(r#"{"contentType": "Forum Post"}"#, now).unwrap();
        assert_eq!(analysis.content_type, "Forum Post");
        assert!((0.0..100.0).contains(&analysis.ai_probability));
    }

    #[test]
    fn test_out_of_range_probability_clamped() {
        let now = Utc::now();
        assert_eq!(parse_classification(r#"{"aiProbability": 250}"#, now).unwrap().ai_probability, 100.0);
        assert_eq!(parse_classification(r#"{"aiProbability": -3}"#, now).unwrap().ai_probability, 0.0);
    }

    #[test]
    fn test_fenced_answer_parsed() {
        let raw = "```json\n{\"contentType\": \"Social Media Post\", \"aiProbability\": 55}\n```";
        let analysis = parse_classification(raw, Utc::now()).unwrap();
        assert_eq!(analysis.content_type, "Social Media Post");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(parse_classification("[1, 2, 3]", Utc::now()).is_err());
    }
}
