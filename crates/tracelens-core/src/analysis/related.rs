//! Related content discovery via a chat model.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};

use super::fallback;
use super::model::{clamp_score, RelatedContentItem, Source};
use super::upstream::ChatModel;

/// System prompt for the related-content call.
const RELATED_PROMPT: &str = r#"You help investigate the origin of online content.
Given a URL, list other content that is likely part of the same campaign or shares its origin.
Respond with ONLY a JSON object of this exact shape:

{
  "relatedContent": [
    {"url": "https://...", "similarity": 0-100, "aiProbability": 0-100}
  ]
}"#;

/// Related content and its provenance.
#[derive(Debug, Clone)]
pub struct RelatedResult {
    pub items: Vec<RelatedContentItem>,
    pub source: Source,
}

/// Asks a chat model for content similar to a URL.
pub struct RelatedContentFinder {
    model: Option<Arc<dyn ChatModel>>,
}

impl RelatedContentFinder {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self { model }
    }

    pub async fn find(&self, url: &str) -> RelatedResult {
        let Some(model) = &self.model else {
            debug!("No chat model configured, related content falls back");
            return fallback_related();
        };

        let user = format!("Find content related to: {}", url);
        let raw = match model.complete_json(RELATED_PROMPT, &user).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Related content call failed, using fallback");
                return fallback_related();
            }
        };

        match parse_related(&raw) {
            Ok(items) => RelatedResult {
                items,
                source: Source::Model,
            },
            Err(e) => {
                warn!(error = %e, "Related content output unusable, using fallback");
                fallback_related()
            }
        }
    }
}

fn fallback_related() -> RelatedResult {
    RelatedResult {
        items: fallback::related_content(&mut rand::rng()),
        source: Source::Fallback,
    }
}

/// Map the model's `relatedContent` array. Entries without a string `url`
/// are dropped; missing scores are drawn at random.
pub(crate) fn parse_related(raw: &str) -> CoreResult<Vec<RelatedContentItem>> {
    let value: Value = serde_json::from_str(&tracelens_llm::extract_json(raw))?;
    let entries = value
        .get("relatedContent")
        .and_then(Value::as_array)
        .ok_or_else(|| CoreError::malformed("relatedContent is missing or not an array"))?;

    let rng = &mut rand::rng();
    let items = entries
        .iter()
        .filter_map(|entry| {
            let url = entry.get("url").and_then(Value::as_str)?.trim();
            if url.is_empty() {
                return None;
            }

            let similarity = match entry.get("similarity").and_then(Value::as_f64) {
                Some(score) => clamp_score(score),
                None => fallback::similarity(&mut *rng),
            };
            let ai_probability = match entry.get("aiProbability").and_then(Value::as_f64) {
                Some(score) => clamp_score(score),
                None => fallback::ai_probability(&mut *rng),
            };

            Some(RelatedContentItem {
                url: url.to_string(),
                similarity,
                ai_probability,
            })
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct CannedChat(Result<String, String>);

    #[async_trait]
    impl ChatModel for CannedChat {
        async fn complete_json(&self, system: &str, user: &str) -> Result<String> {
            assert_eq!(system, RELATED_PROMPT);
            assert!(user.starts_with("Find content related to: "));
            self.0.clone().map_err(anyhow::Error::msg)
        }
    }

    fn finder(answer: Result<&str, &str>) -> RelatedContentFinder {
        let answer = answer.map(str::to_string).map_err(str::to_string);
        RelatedContentFinder::new(Some(Arc::new(CannedChat(answer))))
    }

    fn assert_fixed_fallback(items: &[RelatedContentItem]) {
        assert_eq!(items.len(), 3);
        for (item, (url, low, high)) in items.iter().zip(fallback::FALLBACK_RELATED.iter()) {
            assert_eq!(item.url, *url);
            assert!(item.similarity >= f64::from(*low) && item.similarity < f64::from(*high));
        }
    }

    #[tokio::test]
    async fn test_model_answer_used() {
        let result = finder(Ok(r#"{"relatedContent": [
            {"url": "https://news.example/a", "similarity": 91, "aiProbability": 40},
            {"url": "https://blog.example/b", "similarity": 120}
        ]}"#))
        .find("https://example.com/article")
        .await;

        assert_eq!(result.source, Source::Model);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].url, "https://news.example/a");
        assert_eq!(result.items[0].similarity, 91.0);
        assert_eq!(result.items[0].ai_probability, 40.0);
        assert_eq!(result.items[1].similarity, 100.0);
        assert!((0.0..100.0).contains(&result.items[1].ai_probability));
    }

    #[tokio::test]
    async fn test_missing_field_falls_back() {
        let result = finder(Ok(r#"{"results": []}"#)).find("https://example.com").await;
        assert_eq!(result.source, Source::Fallback);
        assert_fixed_fallback(&result.items);
    }

    #[tokio::test]
    async fn test_non_array_field_falls_back() {
        let result = finder(Ok(r#"{"relatedContent": "none found"}"#)).find("https://example.com").await;
        assert_eq!(result.source, Source::Fallback);
        assert_fixed_fallback(&result.items);
    }

    #[tokio::test]
    async fn test_call_failure_falls_back() {
        let result = finder(Err("timeout")).find("https://example.com").await;
        assert_eq!(result.source, Source::Fallback);
        assert_fixed_fallback(&result.items);
    }

    #[tokio::test]
    async fn test_unconfigured_falls_back() {
        let result = RelatedContentFinder::new(None).find("https://example.com").await;
        assert_eq!(result.source, Source::Fallback);
        assert_fixed_fallback(&result.items);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_related(r#"{"relatedContent": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_missing_similarity_defaults_high() {
        let items = parse_related(r#"{"relatedContent": [{"url": "https://x.example"}]}"#).unwrap();
        assert!((70.0..100.0).contains(&items[0].similarity));
    }

    #[test]
    fn test_entries_without_url_skipped() {
        let items = parse_related(
            r#"{"relatedContent": [{"similarity": 80}, {"url": 5}, {"url": "  "}, {"url": "https://ok.example"}]}"#,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://ok.example");
    }
}
