//! Content provenance analysis.
//!
//! One analysis fetches the page, then runs classification, spread
//! analysis and related-content discovery concurrently and merges the
//! results. Every upstream failure is absorbed by its component; only
//! a missing URL or a crashed task surfaces as an error.

pub mod classifier;
pub mod fallback;
pub mod fetcher;
pub mod model;
pub mod related;
pub mod spread;
pub mod upstream;

use std::sync::Arc;

use tracing::{debug, info, Instrument};

use crate::config::AnalyzerConfig;
use crate::error::{CoreError, CoreResult};

use classifier::ContentClassifier;
use fetcher::{ContentFetcher, HttpFetcher};
use model::{AnalysisReport, AnalysisResponse, Provenance};
use related::RelatedContentFinder;
use spread::SpreadAnalyzer;
use upstream::{ChatModel, ContentSource, TextGenerator};

/// Default token budget for text sent to the classifier.
pub const DEFAULT_MAX_PROMPT_TOKENS: usize = 3000;

/// Runs the full analysis for a URL.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: ContentFetcher,
    classifier: Arc<ContentClassifier>,
    spread: Arc<SpreadAnalyzer>,
    related: Arc<RelatedContentFinder>,
    max_prompt_tokens: usize,
}

impl Analyzer {
    /// Build from explicit upstreams. `None` means that component always
    /// falls back.
    pub fn new(
        source: Arc<dyn ContentSource>,
        chat: Option<Arc<dyn ChatModel>>,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            fetcher: ContentFetcher::new(source),
            classifier: Arc::new(ContentClassifier::new(chat.clone())),
            spread: Arc::new(SpreadAnalyzer::new(generator)),
            related: Arc::new(RelatedContentFinder::new(chat)),
            max_prompt_tokens: DEFAULT_MAX_PROMPT_TOKENS,
        }
    }

    /// Build the HTTP-backed analyzer described by `config`.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let source: Arc<dyn ContentSource> = Arc::new(HttpFetcher::new(
            config.fetch.timeout(),
            &config.fetch.user_agent,
            config.fetch.max_body_bytes,
        ));

        let chat: Option<Arc<dyn ChatModel>> = config
            .llm
            .api_key
            .as_deref()
            .filter(|_| config.llm.is_configured())
            .map(|key| {
                let client = tracelens_llm::OpenAiClient::new(key, &config.llm.model)
                    .with_base_url(&config.llm.base_url)
                    .with_timeout(config.llm.timeout());
                Arc::new(client) as Arc<dyn ChatModel>
            });

        let generator: Option<Arc<dyn TextGenerator>> = config
            .inference
            .api_key
            .as_deref()
            .filter(|_| config.inference.is_configured())
            .map(|key| {
                let client = tracelens_inference::InferenceClient::new(
                    key,
                    &config.inference.base_url,
                    &config.inference.model,
                )
                .with_timeout(config.inference.timeout());
                Arc::new(client) as Arc<dyn TextGenerator>
            });

        info!(
            llm = chat.is_some(),
            inference = generator.is_some(),
            model = %config.llm.model,
            spread_model = %config.inference.model,
            "Analyzer configured"
        );

        Self::new(source, chat, generator)
            .with_max_prompt_tokens(config.fetch.max_prompt_tokens)
            .with_max_body_bytes(config.fetch.max_body_bytes)
    }

    /// Cap on page text kept from a fetch.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.fetcher = self.fetcher.with_max_body_bytes(max_body_bytes);
        self
    }

    pub fn with_max_prompt_tokens(mut self, max_prompt_tokens: usize) -> Self {
        self.max_prompt_tokens = max_prompt_tokens;
        self
    }

    pub fn llm_configured(&self) -> bool {
        self.classifier.is_configured()
    }

    pub fn inference_configured(&self) -> bool {
        self.spread.is_configured()
    }

    /// Analyze the content at `url`.
    #[tracing::instrument(skip(self), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn analyze(&self, url: &str) -> CoreResult<AnalysisReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CoreError::MissingUrl);
        }

        let fetched = self.fetcher.fetch(url).await;

        let budget = self.max_prompt_tokens;
        let page_text = fetched.text.clone();
        let prompt = tokio::task::spawn_blocking(move || {
            tracelens_token::truncate_to_tokens(&page_text, budget)
        })
        .await?;
        debug!(
            tokens = prompt.tokens,
            truncated = prompt.truncated,
            "Classification input budgeted"
        );
        let prompt_text = prompt.text;

        let classification = tokio::spawn({
            let classifier = self.classifier.clone();
            async move { classifier.classify(&prompt_text).await }.in_current_span()
        });
        let spread = tokio::spawn({
            let spread = self.spread.clone();
            let url = url.to_string();
            let text = fetched.text;
            async move { spread.analyze(&url, &text).await }.in_current_span()
        });
        let related = tokio::spawn({
            let related = self.related.clone();
            let url = url.to_string();
            async move { related.find(&url).await }.in_current_span()
        });

        let (classification, spread, related) = tokio::join!(classification, spread, related);
        let (classification, spread, related) = (classification?, spread?, related?);

        let provenance = Provenance {
            fetch: fetched.origin,
            classification: classification.source,
            spread: spread.source,
            related: related.source,
        };

        info!(url, %provenance, "Analysis complete");

        Ok(AnalysisReport {
            response: AnalysisResponse::assemble(
                url,
                classification.analysis,
                spread.analysis,
                related.items,
            ),
            provenance,
        })
    }
}
